use crate::controller::{ViewError, WeekView, WeekViewController};
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_month_or_day, get_required_int, get_year, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;

fn controller(state: &mut AppState) -> Result<&mut WeekViewController<SqliteStore>, HandlerErr> {
    state
        .week
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_store", "no schedule store is open"))
}

fn view_json(view: &WeekView) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(view).map_err(|e| HandlerErr::new("internal", e.to_string()))
}

/// Runs one selection change and reports either the new view or why the
/// previous one is still showing.
fn change(
    state: &mut AppState,
    f: impl FnOnce(&mut WeekViewController<SqliteStore>) -> Result<&WeekView, ViewError>,
) -> Result<serde_json::Value, HandlerErr> {
    let week = controller(state)?;
    match f(&mut *week).map(view_json) {
        Ok(v) => v,
        Err(e) => Err(HandlerErr::from_view(e, Some(week.view()))),
    }
}

fn set_date(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let year = get_year(params, "year")?;
    let month = get_month_or_day(params, "month")?;
    let day = get_month_or_day(params, "day")?;
    change(state, |w| w.select_date(year, month, day))
}

fn dispatch(state: &mut AppState, req: &Request) -> Option<Result<serde_json::Value, HandlerErr>> {
    let params = &req.params;
    let result = match req.method.as_str() {
        "week.view" => controller(state).and_then(|w| view_json(w.view())),
        "week.next" => change(state, |w| w.next_week()),
        "week.prev" => change(state, |w| w.prev_week()),
        "week.advance" => get_required_int(params, "weeks")
            .and_then(|weeks| change(state, |w| w.advance(weeks))),
        "selection.setYear" => {
            get_year(params, "year").and_then(|year| change(state, |w| w.select_year(year)))
        }
        "selection.setMonth" => get_month_or_day(params, "month")
            .and_then(|month| change(state, |w| w.select_month(month))),
        "selection.setDay" => {
            get_month_or_day(params, "day").and_then(|day| change(state, |w| w.select_day(day)))
        }
        "selection.setDate" => set_date(state, params),
        _ => return None,
    };
    Some(result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = dispatch(state, req)?;
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => {
            if e.code == "store_unavailable" {
                log::warn!("{} failed: {}", req.method, e.message);
            }
            e.response(&req.id)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_fixtures::memory_conn;
    use chrono::NaiveDate;
    use serde_json::json;

    fn state_with_week() -> AppState {
        let store = SqliteStore::from_connection(memory_conn(&[
            ("Alice", "2024-06-10", "OR1"),
            ("Bob", "2024-06-12", "OR2"),
        ]))
        .expect("store");
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).expect("today");
        AppState {
            store_path: None,
            week: Some(WeekViewController::start(store, today).expect("start")),
        }
    }

    fn call(state: &mut AppState, method: &str, params: serde_json::Value) -> serde_json::Value {
        let req = Request {
            id: "t".to_string(),
            method: method.to_string(),
            params,
        };
        try_handle(state, &req).expect("handled")
    }

    #[test]
    fn no_store_is_reported() {
        let mut state = AppState::default();
        let resp = call(&mut state, "week.next", json!({}));
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["error"]["code"], "no_store");
    }

    #[test]
    fn set_date_accepts_padded_strings() {
        let mut state = state_with_week();
        let resp = call(
            &mut state,
            "selection.setDate",
            json!({ "year": "2024", "month": "06", "day": "17" }),
        );
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["result"]["monday"], "2024-06-17");
        assert_eq!(resp["result"]["selection"]["day"], 17);
    }

    #[test]
    fn invalid_day_is_rejected_and_view_kept() {
        let mut state = state_with_week();
        let resp = call(&mut state, "selection.setDate", json!({ "year": 2023, "month": 4, "day": 31 }));
        assert_eq!(resp["error"]["code"], "invalid_date");
        let view = call(&mut state, "week.view", json!({}));
        assert_eq!(view["result"]["monday"], "2024-06-10");
    }

    #[test]
    fn unknown_method_falls_through() {
        let mut state = state_with_week();
        let req = Request {
            id: "t".to_string(),
            method: "week.nope".to_string(),
            params: json!({}),
        };
        assert!(try_handle(&mut state, &req).is_none());
    }
}
