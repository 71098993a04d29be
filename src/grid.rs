use crate::calendar::{header_label, weekday_header, WeekWindow};
use crate::store::{AssignmentSource, StoreError};
use serde::Serialize;

/// Rendered in place of a missing assignment.
pub const ABSENCE_MARKER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub weekday: &'static str,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub person: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridModel {
    pub label: String,
    pub header: Vec<HeaderCell>,
    pub rows: Vec<GridRow>,
}

pub fn build_grid<S: AssignmentSource + ?Sized>(
    roster: &[String],
    window: &WeekWindow,
    source: &S,
) -> Result<GridModel, StoreError> {
    let header = weekday_header(window)
        .into_iter()
        .map(|(weekday, day)| HeaderCell { weekday, day })
        .collect();

    let mut rows = Vec::with_capacity(roster.len());
    for person in roster {
        let week = source.week_assignments(person, window)?;
        let cells = week
            .into_iter()
            .map(|a| a.into_option().unwrap_or_else(|| ABSENCE_MARKER.to_string()))
            .collect();
        rows.push(GridRow {
            person: person.clone(),
            cells,
        });
    }

    Ok(GridModel {
        label: header_label(window.monday, window.sunday),
        header,
        rows,
    })
}
