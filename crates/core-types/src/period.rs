use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fiscal quarter, written as `YYYY-Qn` (e.g. `2025-Q3`).
///
/// Parsing is strict: exactly four year digits, an uppercase `Q` and a quarter
/// between 1 and 4. Every accepted string is therefore identical to the
/// `Display` output, and ordering by `(year, quarter)` matches the lexical
/// ordering of the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: u16,
    quarter: u8,
}

impl Period {
    pub fn new(year: u16, quarter: u8) -> Result<Self, CoreError> {
        if !(1000..=9999).contains(&year) {
            return Err(CoreError::validation("period", format!("year {year} is not four digits")));
        }
        if !(1..=4).contains(&quarter) {
            return Err(CoreError::validation("period", format!("quarter {quarter} is outside 1..=4")));
        }
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The quarter immediately following this one, or `None` after `9999-Q4`.
    pub fn next(&self) -> Option<Self> {
        if self.quarter < 4 {
            Some(Self { year: self.year, quarter: self.quarter + 1 })
        } else if self.year < 9999 {
            Some(Self { year: self.year + 1, quarter: 1 })
        } else {
            None
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::validation("period", format!("'{s}' is not in YYYY-Qn form"));

        let (year, quarter) = s.split_once("-Q").ok_or_else(malformed)?;
        if year.len() != 4 || quarter.len() != 1 {
            return Err(malformed());
        }
        if !year.bytes().all(|b| b.is_ascii_digit()) || !quarter.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: u16 = year.parse().map_err(|_| malformed())?;
        let quarter: u8 = quarter.parse().map_err(|_| malformed())?;
        Period::new(year, quarter)
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
