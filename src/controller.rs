use crate::calendar::{self, resolve_week, CalendarError, Selection};
use crate::grid::{build_grid, GridModel};
use crate::store::{AssignmentSource, StoreError};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    InvalidDate(#[from] CalendarError),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// People shown as grid rows, captured once when the controller starts.
/// Rows added to the store afterwards do not appear until a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn snapshot<S: AssignmentSource + ?Sized>(source: &S) -> Result<Self, StoreError> {
        Ok(Self(source.list_distinct_people()?))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub selection: Selection,
    pub monday: String,
    pub sunday: String,
    pub days: Vec<String>,
    pub grid: GridModel,
}

pub struct WeekViewController<S> {
    source: S,
    roster: Roster,
    view: WeekView,
}

impl<S: AssignmentSource> WeekViewController<S> {
    pub fn start(source: S, today: NaiveDate) -> Result<Self, ViewError> {
        let roster = Roster::snapshot(&source)?;
        let selection = Selection::from_date(today);
        let view = render(&source, &roster, selection)?;
        log::info!(
            "week view started: {} people, week of {}",
            roster.names().len(),
            view.monday
        );
        Ok(Self {
            source,
            roster,
            view,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selection(&self) -> Selection {
        self.view.selection
    }

    /// Last view that rendered completely.
    pub fn view(&self) -> &WeekView {
        &self.view
    }

    // Year and month changes re-enumerate the day list and land on its first entry.
    pub fn select_year(&mut self, year: i32) -> Result<&WeekView, ViewError> {
        let next = Selection::new(year, self.selection().month(), 1)?;
        self.apply(next)
    }

    pub fn select_month(&mut self, month: u32) -> Result<&WeekView, ViewError> {
        let next = Selection::new(self.selection().year(), month, 1)?;
        self.apply(next)
    }

    pub fn select_day(&mut self, day: u32) -> Result<&WeekView, ViewError> {
        let next = Selection::new(self.selection().year(), self.selection().month(), day)?;
        self.apply(next)
    }

    pub fn select_date(&mut self, year: i32, month: u32, day: u32) -> Result<&WeekView, ViewError> {
        let next = Selection::new(year, month, day)?;
        self.apply(next)
    }

    pub fn advance(&mut self, delta_weeks: i64) -> Result<&WeekView, ViewError> {
        let next = calendar::advance(self.selection(), delta_weeks)?;
        self.apply(next)
    }

    pub fn next_week(&mut self) -> Result<&WeekView, ViewError> {
        self.advance(1)
    }

    pub fn prev_week(&mut self) -> Result<&WeekView, ViewError> {
        self.advance(-1)
    }

    fn apply(&mut self, next: Selection) -> Result<&WeekView, ViewError> {
        let view = match render(&self.source, &self.roster, next) {
            Ok(v) => v,
            Err(e) => {
                log::warn!(
                    "render for {} failed, keeping week of {}: {}",
                    next.date(),
                    self.view.monday,
                    e
                );
                return Err(e.into());
            }
        };
        self.view = view;
        Ok(&self.view)
    }
}

fn render<S: AssignmentSource + ?Sized>(
    source: &S,
    roster: &Roster,
    selection: Selection,
) -> Result<WeekView, StoreError> {
    let window = resolve_week(selection.date());
    let grid = build_grid(roster.names(), &window, source)?;
    let days = selection.day_choices();
    Ok(WeekView {
        selection,
        monday: window.monday.format("%Y-%m-%d").to_string(),
        sunday: window.sunday.format("%Y-%m-%d").to_string(),
        days,
        grid,
    })
}
