use crate::calendar;
use crate::controller::WeekViewController;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, AssignmentSource};
use chrono::NaiveDate;
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "storePath": state.store_path.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Opens the store, snapshots the roster and renders the week containing
/// `today`. The previous store, if any, stays active when this fails.
pub fn open_store(
    state: &mut AppState,
    path: &Path,
    today: NaiveDate,
) -> Result<serde_json::Value, HandlerErr> {
    let source = store::open_store(path).map_err(|e| {
        HandlerErr::new("store_unavailable", e.to_string())
            .with_details(json!({ "path": path.to_string_lossy() }))
    })?;
    let years = source
        .list_distinct_years()
        .map_err(|e| HandlerErr::new("store_unavailable", e.to_string()))?;
    let controller =
        WeekViewController::start(source, today).map_err(|e| HandlerErr::from_view(e, None))?;

    let result = json!({
        "storePath": path.to_string_lossy(),
        "roster": controller.roster().names(),
        "years": year_choices(&years),
        "months": calendar::month_choices(),
        "days": controller.view().days,
        "view": controller.view(),
    });
    log::info!("opened schedule store {}", path.display());
    state.store_path = Some(path.to_path_buf());
    state.week = Some(controller);
    Ok(result)
}

pub fn year_choices(years: &[i32]) -> Vec<String> {
    years.iter().map(|y| format!("{:04}", y)).collect()
}

fn parse_today(params: &serde_json::Value) -> Result<NaiveDate, HandlerErr> {
    match params.get("today").and_then(|v| v.as_str()) {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), store::DATE_FORMAT).map_err(|_| {
            HandlerErr::new("invalid_date", "today must be YYYY-MM-DD")
                .with_details(json!({ "today": raw }))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn handle_store_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match get_required_str(&req.params, "path") {
        Ok(p) => PathBuf::from(p),
        Err(e) => return e.response(&req.id),
    };
    let today = match parse_today(&req.params) {
        Ok(d) => d,
        Err(e) => return e.response(&req.id),
    };
    match open_store(state, &path, today) {
        Ok(result) => ok(&req.id, result),
        Err(e) => {
            log::warn!("failed to open schedule store {}: {}", path.display(), e.message);
            e.response(&req.id)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "store.open" => Some(handle_store_open(state, req)),
        _ => None,
    }
}
