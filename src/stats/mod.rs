//! Stats module - Descriptive aggregates over paper tables

mod calculator;

pub use calculator::{JournalCount, PaperSummary, WordFrequency, YearCount};
