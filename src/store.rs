use crate::calendar::WeekWindow;
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("schedule store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Assigned(String),
    Absent,
}

impl Assignment {
    pub fn into_option(self) -> Option<String> {
        match self {
            Assignment::Assigned(text) => Some(text),
            Assignment::Absent => None,
        }
    }
}

/// Read-only queries the week view needs from wherever assignments live.
pub trait AssignmentSource {
    fn list_distinct_people(&self) -> Result<Vec<String>, StoreError>;

    fn list_distinct_years(&self) -> Result<Vec<i32>, StoreError>;

    fn get_assignment(&self, person: &str, date: NaiveDate) -> Result<Assignment, StoreError>;

    /// All seven days of one person's week. Sources with a cheaper ranged
    /// query may override this; the result must match per-day lookups.
    fn week_assignments(
        &self,
        person: &str,
        window: &WeekWindow,
    ) -> Result<[Assignment; 7], StoreError> {
        let mut out: [Assignment; 7] = std::array::from_fn(|_| Assignment::Absent);
        for (slot, date) in out.iter_mut().zip(window.dates.iter()) {
            *slot = self.get_assignment(person, *date)?;
        }
        Ok(out)
    }
}

pub struct SqliteStore {
    conn: Connection,
}

pub fn open_store(path: &Path) -> Result<SqliteStore, StoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    SqliteStore::from_connection(conn)
}

impl SqliteStore {
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        // Fail at open time rather than on the first render if the table is missing.
        conn.query_row("SELECT COUNT(*) FROM assignments", [], |r| {
            r.get::<_, i64>(0)
        })?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }
}

impl AssignmentSource for SqliteStore {
    fn list_distinct_people(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT anesthesiologist
             FROM assignments
             WHERE anesthesiologist IS NOT NULL
             GROUP BY anesthesiologist
             ORDER BY MIN(rowid)",
        )?;
        let people = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(people)
    }

    fn list_distinct_years(&self) -> Result<Vec<i32>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(date, 1, 4) AS y
             FROM assignments
             ORDER BY y",
        )?;
        let raw = stmt
            .query_map([], |r| r.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut years = Vec::with_capacity(raw.len());
        for y in raw {
            match y.as_deref().map(str::parse::<i32>) {
                Some(Ok(v)) => years.push(v),
                _ => log::warn!("skipping unusable year prefix {:?}", y),
            }
        }
        Ok(years)
    }

    fn get_assignment(&self, person: &str, date: NaiveDate) -> Result<Assignment, StoreError> {
        let day = date.format(DATE_FORMAT).to_string();
        // A row with a NULL assignment still wins the tie-break; it just reads as absent.
        let text: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT assignment
                 FROM assignments
                 WHERE anesthesiologist = ? AND date = ?
                 ORDER BY rowid
                 LIMIT 1",
                (person, &day),
                |r| r.get(0),
            )
            .optional()?;
        Ok(text
            .flatten()
            .map(Assignment::Assigned)
            .unwrap_or(Assignment::Absent))
    }

    fn week_assignments(
        &self,
        person: &str,
        window: &WeekWindow,
    ) -> Result<[Assignment; 7], StoreError> {
        let first = window.monday.format(DATE_FORMAT).to_string();
        let last = window.sunday.format(DATE_FORMAT).to_string();
        let mut stmt = self.conn.prepare_cached(
            "SELECT date, assignment
             FROM assignments
             WHERE anesthesiologist = ? AND date BETWEEN ? AND ?
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map((person, &first, &last), |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, Option<String>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Rows arrive in rowid order; keep the first per date.
        let mut by_date: HashMap<String, Option<String>> = HashMap::new();
        for (day, text) in rows {
            by_date.entry(day).or_insert(text);
        }

        let mut out: [Assignment; 7] = std::array::from_fn(|_| Assignment::Absent);
        for (slot, date) in out.iter_mut().zip(window.dates.iter()) {
            let key = date.format(DATE_FORMAT).to_string();
            if let Some(Some(text)) = by_date.remove(&key) {
                *slot = Assignment::Assigned(text);
            }
        }
        Ok(out)
    }
}
