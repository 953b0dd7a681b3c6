use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Season encoded in the last two digits of a term code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// January to April (`01`)
    Spring,
    /// May to August (`05`)
    Summer,
    /// September to December (`09`)
    Fall,
    Unknown,
}

impl Season {
    pub const fn code(self) -> Option<u32> {
        match self {
            Self::Spring => Some(1),
            Self::Summer => Some(5),
            Self::Fall => Some(9),
            Self::Unknown => None,
        }
    }

    const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Spring,
            5 => Self::Summer,
            9 => Self::Fall,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Unknown => "Unknown",
        })
    }
}

/// Term code of the form `YYYYSS`, e.g. `202409` for Fall 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(pub u32);

impl Term {
    pub const fn year(self) -> u32 {
        self.0 / 100
    }

    pub const fn season(self) -> Season {
        Season::from_code(self.0 % 100)
    }

    /// Term in session on `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let season = match date.month() {
            1..=4 => Season::Spring,
            5..=8 => Season::Summer,
            _ => Season::Fall,
        };
        let year = u32::try_from(date.year()).unwrap_or_default();
        Self(year * 100 + season.code().unwrap_or(9))
    }

    pub fn current() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season(), self.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        assert_eq!(Term(202409).to_string(), "Fall 2024");
        assert_eq!(Term(202501).to_string(), "Spring 2025");
        assert_eq!(Term(202505).to_string(), "Summer 2025");
        assert_eq!(Term(202507).to_string(), "Unknown 2025");
    }

    #[test]
    fn test_term_detection() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(Term::for_date(date), Term(202501));

        let date = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        assert_eq!(Term::for_date(date), Term(202501));

        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(Term::for_date(date), Term(202505));

        let date = NaiveDate::from_ymd_opt(2024, 9, 3).unwrap();
        assert_eq!(Term::for_date(date), Term(202409));
        assert_eq!(Term::for_date(date).season(), Season::Fall);
    }
}
