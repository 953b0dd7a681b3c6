//! Timetable Core Library
//!
//! Course selection, conflict checking, color assignment, weekly calendar
//! projection and ICS export for a university course catalog.

pub mod calendar;
pub mod color;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod ics;
pub mod persistence;
pub mod storage;
pub mod term;
pub mod time;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        engine::*, ics::IcsExporter, persistence::TimetableStore, storage::*, term::Term,
        types::*,
    };
}
