//! Data module - CSV loading, cleaning and filtering

mod loader;
mod processor;

pub use loader::{load_papers_cached, JOURNAL, TITLE, YEAR};
pub use processor::{DataProcessor, ProcessorError, SampleRow, YearRange};

#[cfg(test)]
pub(crate) use loader::tests::{sample_papers, write_csv};
