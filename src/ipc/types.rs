use std::path::PathBuf;

use crate::controller::WeekViewController;
use crate::store::SqliteStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Default)]
pub struct AppState {
    pub store_path: Option<PathBuf>,
    pub week: Option<WeekViewController<SqliteStore>>,
}
