//! Data Processor Module
//! Year-range filtering, sample projection and CSV export of paper tables.

use super::loader::{ABSTRACT, JOURNAL, TITLE, YEAR};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Inclusive range of publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Clamp both bounds into `domain`, keeping `start <= end`.
    pub fn clamp_to(&self, domain: YearRange) -> YearRange {
        let start = self.start.clamp(domain.start, domain.end);
        let end = self.end.clamp(start, domain.end);
        YearRange { start, end }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One row of the sample table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub title: Option<String>,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub abstract_text: Option<String>,
}

/// Stateless operations over cleaned paper tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Smallest and largest non-null year, or `None` when there are none.
    pub fn year_domain(df: &DataFrame) -> Result<Option<YearRange>, ProcessorError> {
        let years = df.column(YEAR)?.i32()?;
        Ok(years.min().zip(years.max()).map(|(start, end)| YearRange { start, end }))
    }

    /// Rows whose year lies inside `range`. Null years never match and source
    /// order is kept.
    pub fn filter_by_years(df: &DataFrame, range: YearRange) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(YEAR)
                    .gt_eq(lit(range.start))
                    .and(col(YEAR).lt_eq(lit(range.end))),
            )
            .collect()?;
        Ok(filtered)
    }

    /// First `n` rows projected to title, journal, year and abstract.
    pub fn sample_rows(df: &DataFrame, n: usize) -> Result<Vec<SampleRow>, ProcessorError> {
        let head = df.head(Some(n));
        let titles = head.column(TITLE)?.str()?;
        let journals = head.column(JOURNAL)?.str()?;
        let years = head.column(YEAR)?.i32()?;
        let abstracts = head.column(ABSTRACT)?.str()?;

        let rows = titles
            .into_iter()
            .zip(journals.into_iter())
            .zip(years.into_iter())
            .zip(abstracts.into_iter())
            .map(|(((title, journal), year), abstract_text)| SampleRow {
                title: title.map(str::to_string),
                journal: journal.map(str::to_string),
                year,
                abstract_text: abstract_text.map(str::to_string),
            })
            .collect();
        Ok(rows)
    }

    /// Serialize the whole table as comma separated UTF-8 with a header row
    /// and no index column.
    pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>, ProcessorError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut df = df.clone();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_papers;
    use crate::data::{sample_papers, write_csv};

    fn years_of(df: &DataFrame) -> Vec<Option<i32>> {
        df.column(YEAR).unwrap().i32().unwrap().into_iter().collect()
    }

    fn titles_of(df: &DataFrame) -> Vec<String> {
        df.column(TITLE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|t| t.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_year_domain() {
        let df = sample_papers();
        assert_eq!(
            DataProcessor::year_domain(&df).unwrap(),
            Some(YearRange::new(2019, 2021))
        );
    }

    #[test]
    fn test_year_domain_empty() {
        let df = sample_papers();
        let none = DataProcessor::filter_by_years(&df, YearRange::new(1900, 1901)).unwrap();
        assert_eq!(none.height(), 0);
        assert_eq!(DataProcessor::year_domain(&none).unwrap(), None);
    }

    #[test]
    fn test_filter_example_range() {
        // Years {2019, 2020, 2020, 2021} filtered to 2020..=2021.
        let df = sample_papers();
        let filtered = DataProcessor::filter_by_years(&df, YearRange::new(2020, 2021)).unwrap();
        assert_eq!(filtered.height(), 3);
        assert_eq!(years_of(&filtered), vec![Some(2020), Some(2020), Some(2021)]);
    }

    #[test]
    fn test_filter_keeps_source_order() {
        let df = sample_papers();
        let filtered = DataProcessor::filter_by_years(&df, YearRange::new(2019, 2021)).unwrap();
        assert_eq!(titles_of(&filtered), titles_of(&df));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let df = sample_papers();
        let range = YearRange::new(2020, 2020);
        let once = DataProcessor::filter_by_years(&df, range).unwrap();
        let twice = DataProcessor::filter_by_years(&once, range).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_filter_is_monotonic() {
        let df = sample_papers();
        let narrow = DataProcessor::filter_by_years(&df, YearRange::new(2020, 2020)).unwrap();
        let wide = DataProcessor::filter_by_years(&df, YearRange::new(2019, 2021)).unwrap();
        let wide_titles = titles_of(&wide);
        for title in titles_of(&narrow) {
            assert!(wide_titles.contains(&title), "{title} missing from wider range");
        }
    }

    #[test]
    fn test_year_range_clamp() {
        let domain = YearRange::new(2000, 2010);
        assert_eq!(YearRange::new(1990, 2020).clamp_to(domain), domain);
        assert_eq!(
            YearRange::new(2008, 2005).clamp_to(domain),
            YearRange::new(2008, 2008)
        );
        assert_eq!(domain.to_string(), "2000 to 2010");
    }

    #[test]
    fn test_sample_rows() {
        let df = sample_papers();
        let rows = DataProcessor::sample_rows(&df, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title.as_deref(), Some("Coronavirus spread in bats"));
        assert_eq!(rows[0].journal.as_deref(), Some("Virology"));
        assert_eq!(rows[0].year, Some(2019));

        let all = DataProcessor::sample_rows(&df, 10).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[2].abstract_text, None);
    }

    #[test]
    fn test_csv_export_round_trips_rows() {
        let df = sample_papers();
        let filtered = DataProcessor::filter_by_years(&df, YearRange::new(2020, 2020)).unwrap();
        let bytes = DataProcessor::to_csv_bytes(&filtered).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("cord_uid,title,publish_time,journal,abstract"));
        assert!(header.contains("year"));
        assert_eq!(lines.count(), 2);
        assert!(text.contains("2020-03-15"));
    }

    #[test]
    fn test_csv_export_of_empty_set_is_header_only() {
        let df = sample_papers();
        let empty = DataProcessor::filter_by_years(&df, YearRange::new(1800, 1801)).unwrap();
        let text = String::from_utf8(DataProcessor::to_csv_bytes(&empty).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("cord_uid,title"));
    }

    #[test]
    fn test_exported_csv_loads_back() {
        let df = sample_papers();
        let text = String::from_utf8(DataProcessor::to_csv_bytes(&df).unwrap()).unwrap();
        let (_dir, path) = write_csv(&text);
        let reloaded = load_papers(&path).unwrap();
        assert_eq!(reloaded.height(), df.height());
        assert_eq!(years_of(&reloaded), years_of(&df));
    }
}
