use crate::controller::{ViewError, WeekView};
use crate::ipc::error::err;
use serde_json::json;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }

    /// Maps a rejected view change. A store failure carries the view that is
    /// still on screen so the caller can keep showing it.
    pub fn from_view(e: ViewError, last: Option<&WeekView>) -> Self {
        match e {
            ViewError::InvalidDate(inner) => Self::new("invalid_date", inner.to_string()),
            ViewError::StoreUnavailable(inner) => {
                let out = Self::new("store_unavailable", inner.to_string());
                match last {
                    Some(view) => out.with_details(json!({ "lastView": view })),
                    None => out,
                }
            }
        }
    }
}

pub fn get_required_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing params.{}", key)))
}

/// Integer param. Pickers hand over zero-padded strings ("06"), so numeric
/// strings are accepted alongside JSON numbers.
pub fn get_required_int(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Err(HandlerErr::new("bad_params", format!("missing params.{}", key)));
    };
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    v.as_str()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            HandlerErr::new("bad_params", format!("params.{} must be an integer", key))
                .with_details(json!({ key: v }))
        })
}

pub fn get_year(params: &serde_json::Value, key: &str) -> Result<i32, HandlerErr> {
    let v = get_required_int(params, key)?;
    i32::try_from(v)
        .map_err(|_| HandlerErr::new("invalid_date", format!("year out of range: {}", v)))
}

/// Month or day. Values that cannot be a month or day at all are still
/// handed on as-is so that calendar validation reports them.
pub fn get_month_or_day(params: &serde_json::Value, key: &str) -> Result<u32, HandlerErr> {
    let v = get_required_int(params, key)?;
    u32::try_from(v)
        .map_err(|_| HandlerErr::new("invalid_date", format!("{} out of range: {}", key, v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_accept_numbers_and_padded_strings() {
        let params = json!({ "a": 6, "b": "06", "c": " 2024 ", "d": "x", "e": true });
        assert_eq!(get_required_int(&params, "a").ok(), Some(6));
        assert_eq!(get_required_int(&params, "b").ok(), Some(6));
        assert_eq!(get_required_int(&params, "c").ok(), Some(2024));
        assert_eq!(get_required_int(&params, "d").err().map(|e| e.code), Some("bad_params"));
        assert_eq!(get_required_int(&params, "e").err().map(|e| e.code), Some("bad_params"));
        assert_eq!(
            get_required_int(&params, "missing").err().map(|e| e.code),
            Some("bad_params")
        );
    }

    #[test]
    fn negative_days_are_invalid_dates() {
        let params = json!({ "day": -1 });
        assert_eq!(
            get_month_or_day(&params, "day").err().map(|e| e.code),
            Some("invalid_date")
        );
    }
}
