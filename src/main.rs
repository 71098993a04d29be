mod calendar;
mod config;
mod controller;
mod grid;
mod ipc;
mod store;

use anyhow::Context;
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    config::init_logging();
    let cfg = config::Config::from_env();
    let mut state = ipc::AppState::default();

    if let Some(path) = cfg.db_path.as_ref() {
        // A bad startup store is not fatal; the UI can still send store.open.
        let today = chrono::Local::now().date_naive();
        if let Err(e) = ipc::open_store(&mut state, path, today) {
            log::error!(
                "could not open {} from {}: {}",
                path.display(),
                config::DB_ENV,
                e.message
            );
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => {
                log::debug!("request {} {}", req.id, req.method);
                ipc::handle_request(&mut state, req)
            }
            // Can't reply with an id; the client matches on the error code.
            Err(e) => ipc::bad_json(e.to_string()),
        };
        // A closed stdout means the UI is gone; stop serving.
        writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        )
        .context("failed to write response")?;
        stdout.flush().context("failed to flush response")?;
    }
    log::info!("stdin closed, exiting");
    Ok(())
}
