use crate::calendar;
use crate::ipc::error::ok;
use crate::ipc::handlers::core::year_choices;
use crate::ipc::helpers::{get_month_or_day, get_year, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::AssignmentSource;
use serde_json::json;

fn calendar_years(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(week) = state.week.as_ref() else {
        return Err(HandlerErr::new("no_store", "no schedule store is open"));
    };
    let years = week
        .source()
        .list_distinct_years()
        .map_err(|e| HandlerErr::new("store_unavailable", e.to_string()))?;
    Ok(json!({ "years": year_choices(&years) }))
}

fn calendar_days(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let year = get_year(params, "year")?;
    let month = get_month_or_day(params, "month")?;
    let days = calendar::day_choices(year, month)
        .map_err(|e| HandlerErr::new("invalid_date", e.to_string()))?;
    Ok(json!({ "days": days }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "calendar.years" => calendar_years(state),
        "calendar.months" => Ok(json!({ "months": calendar::month_choices() })),
        "calendar.days" => calendar_days(&req.params),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
