//! Calendar-date deadline in the fixed `YYYY-MM-DD` format

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// A validated deadline date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(NaiveDate);

/// Input that is not a real date in canonical `YYYY-MM-DD` form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid deadline {0:?}, expected YYYY-MM-DD")]
pub struct InvalidDeadline(pub String);

impl FromStr for Deadline {
    type Err = InvalidDeadline;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_canonical_shape(s) {
            return Err(InvalidDeadline(s.to_string()));
        }

        let date = NaiveDate::parse_from_str(s, DEADLINE_FORMAT)
            .map_err(|_| InvalidDeadline(s.to_string()))?;

        Ok(Deadline(date))
    }
}

/// Exactly `DDDD-DD-DD`; chrono alone also takes signed and unpadded years
fn is_canonical_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEADLINE_FORMAT))
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
