//! Reports submitted by one node about another

use std::fmt;

use crate::{TrustError, TrustResult};

/// Endorsement flag attached to a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Note {
    /// The reporter speaks against the target
    Negative = -1,
    /// No endorsement either way
    #[default]
    Neutral = 0,
    /// The reporter vouches for the target
    Positive = 1,
}

impl Note {
    /// Numeric encoding (-1, 0, 1)
    #[inline]
    pub fn value(self) -> i64 {
        self as i8 as i64
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self == Note::Negative
    }

    /// Get all notes
    pub fn all() -> &'static [Note] {
        &[Note::Negative, Note::Neutral, Note::Positive]
    }
}

impl TryFrom<i64> for Note {
    type Error = TrustError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Note::Negative),
            0 => Ok(Note::Neutral),
            1 => Ok(Note::Positive),
            other => Err(TrustError::InvalidNote(other)),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// One row of observed values submitted by a reporting node.
///
/// Context values below zero mean "no observation"; such reports never
/// receive a weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    /// Observed service value (S_j)
    pub service: i64,
    /// Observed capability value (C_j)
    pub capability: i64,
    /// Endorsement (N_j)
    pub note: Note,
    /// Submission tick
    pub time: i64,
}

impl Report {
    pub fn new(service: i64, capability: i64, note: Note, time: i64) -> Self {
        Report {
            service,
            capability,
            note,
            time,
        }
    }

    /// Both context values carry an observation
    #[inline]
    pub fn has_valid_context(&self) -> bool {
        self.service >= 0 && self.capability >= 0
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.note = note;
        self
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }
}

/// Column layout of a raw report table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportSchema {
    pub service: usize,
    pub capability: usize,
    pub note: usize,
    pub time: usize,
}

impl Default for ReportSchema {
    fn default() -> Self {
        ReportSchema {
            service: 0,
            capability: 1,
            note: 2,
            time: 3,
        }
    }
}

impl ReportSchema {
    /// Minimum row width this schema can read
    pub fn width(&self) -> usize {
        self.service
            .max(self.capability)
            .max(self.note)
            .max(self.time)
            + 1
    }

    /// Decode a single raw row
    pub fn decode(&self, row: &[i64]) -> TrustResult<Report> {
        let column = |index: usize| {
            row.get(index).copied().ok_or(TrustError::ColumnOutOfBounds {
                column: index,
                width: row.len(),
            })
        };

        Ok(Report {
            service: column(self.service)?,
            capability: column(self.capability)?,
            note: Note::try_from(column(self.note)?)?,
            time: column(self.time)?,
        })
    }

    /// Encode a report into a row laid out by this schema
    pub fn encode(&self, report: &Report) -> Vec<i64> {
        let mut row = vec![0; self.width()];
        row[self.service] = report.service;
        row[self.capability] = report.capability;
        row[self.note] = report.note.value();
        row[self.time] = report.time;
        row
    }
}

/// Tabular report input: raw integer rows addressed through a schema
#[derive(Clone, Debug, Default)]
pub struct ReportTable {
    rows: Vec<Vec<i64>>,
    schema: ReportSchema,
}

impl ReportTable {
    pub fn new(schema: ReportSchema) -> Self {
        ReportTable {
            rows: Vec::new(),
            schema,
        }
    }

    pub fn from_rows(rows: Vec<Vec<i64>>, schema: ReportSchema) -> Self {
        ReportTable { rows, schema }
    }

    /// Append a report, encoded with the table's schema
    pub fn push(&mut self, report: &Report) {
        self.rows.push(self.schema.encode(report));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode every row, in order
    pub fn reports(&self) -> TrustResult<Vec<Report>> {
        self.rows.iter().map(|row| self.schema.decode(row)).collect()
    }
}
