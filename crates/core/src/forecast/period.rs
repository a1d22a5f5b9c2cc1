//! Quarter arithmetic.

use serde::{Deserialize, Serialize};

use super::error::ForecastError;

/// A calendar quarter.
///
/// Ordering is chronological: year first, then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct Period {
    year: i32,
    quarter: u8,
}

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    quarter: u8,
}

impl TryFrom<PeriodParts> for Period {
    type Error = ForecastError;

    fn try_from(parts: PeriodParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.quarter)
    }
}

impl Period {
    /// Creates a period, rejecting quarters outside 1-4.
    pub fn new(year: i32, quarter: u8) -> Result<Self, ForecastError> {
        if (1..=4).contains(&quarter) {
            Ok(Self { year, quarter })
        } else {
            Err(ForecastError::InvalidQuarter(quarter))
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Quarter within the year (1-4).
    #[must_use]
    pub const fn quarter(self) -> u8 {
        self.quarter
    }

    /// The following quarter. Q4 rolls into Q1 of the next year.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// Applies [`Period::next`] `n` times.
    #[must_use]
    pub fn advance(self, n: u32) -> Self {
        (0..n).fold(self, |period, _| period.next())
    }

    /// Number of quarters from `earlier` to `self`; negative if `earlier` is later.
    #[must_use]
    pub fn quarters_since(self, earlier: Self) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    /// `count` consecutive quarters starting at (and including) `self`.
    pub fn horizon(self, count: u32) -> impl Iterator<Item = Self> {
        (0..count).scan(self, |period, _| {
            let current = *period;
            *period = current.next();
            Some(current)
        })
    }

    fn ordinal(self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter) - 1
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}
