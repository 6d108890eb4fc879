//! Paper Metadata Loader Module
//! Loads `metadata.csv` with Polars, drops incomplete rows and derives
//! `year` and `abstract_word_count`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const TITLE: &str = "title";
pub const PUBLISH_TIME: &str = "publish_time";
pub const JOURNAL: &str = "journal";
pub const ABSTRACT: &str = "abstract";
pub const YEAR: &str = "year";
pub const ABSTRACT_WORD_COUNT: &str = "abstract_word_count";

/// Columns the explorer reads. Anything else is carried through untouched.
pub const REQUIRED_COLUMNS: [&str; 4] = [TITLE, PUBLISH_TIME, JOURNAL, ABSTRACT];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y %b %d", "%d %b %Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

static BASE_TABLE: OnceCell<DataFrame> = OnceCell::new();

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(&'static str),
}

/// Load and clean the paper table once per process.
///
/// The first successful load is kept for the lifetime of the process and
/// returned for every later call, whatever `path` is passed.
pub fn load_papers_cached(path: &Path) -> Result<&'static DataFrame, LoaderError> {
    BASE_TABLE.get_or_try_init(|| load_papers(path))
}

/// Load a CSV file and return the cleaned paper table.
///
/// Rows without a title or without a parseable publish date are dropped.
/// `publish_time` becomes a `Date` column and `year` / `abstract_word_count`
/// are appended.
pub fn load_papers(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    // Every column is read as text; inferring from a prefix of bare years
    // would type `publish_time` as integers and null out later full dates.
    let raw = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    for name in REQUIRED_COLUMNS {
        if raw.get_column_index(name).is_none() {
            return Err(LoaderError::MissingColumn(name));
        }
    }

    let cleaned = clean_papers(raw)?;
    info!(
        path = %path.display(),
        rows = cleaned.height(),
        "loaded paper metadata"
    );
    Ok(cleaned)
}

/// Apply the cleaning rules to a freshly read table.
fn clean_papers(df: DataFrame) -> Result<DataFrame, LoaderError> {
    let titles = df.column(TITLE)?.str()?;
    let times = df.column(PUBLISH_TIME)?.str()?;
    let abstracts = df.column(ABSTRACT)?.str()?;

    let mut keep: Vec<bool> = Vec::with_capacity(df.height());
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut word_counts: Vec<u32> = Vec::new();

    for ((title, time), abstract_text) in titles
        .into_iter()
        .zip(times.into_iter())
        .zip(abstracts.into_iter())
    {
        let has_title = title.is_some_and(|t| !t.trim().is_empty());
        match time.and_then(parse_publish_date) {
            Some(date) if has_title => {
                keep.push(true);
                dates.push(date);
                years.push(date.year());
                word_counts.push(abstract_word_count(abstract_text));
            }
            _ => keep.push(false),
        }
    }

    let dropped = keep.iter().filter(|k| !**k).count();
    debug!(dropped, "dropped rows without title or publish date");

    let mask = BooleanChunked::new("keep".into(), keep.as_slice());
    let mut cleaned = df.filter(&mask)?;
    cleaned.with_column(Column::new(PUBLISH_TIME.into(), dates))?;
    cleaned.with_column(Column::new(YEAR.into(), years))?;
    cleaned.with_column(Column::new(ABSTRACT_WORD_COUNT.into(), word_counts))?;

    Ok(cleaned)
}

/// Whitespace-separated token count; a missing abstract counts as zero.
pub fn abstract_word_count(abstract_text: Option<&str>) -> u32 {
    abstract_text.map_or(0, |text| text.split_whitespace().count() as u32)
}

/// Parse a publish date leniently, returning `None` for unparseable input.
///
/// Partial dates (`2020`, `2020-03`, `2020 Mar`, `Mar 2020`) resolve to the
/// first day of the period.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    parse_full_date(s)
        .or_else(|| parse_full_date(&format!("{s}-01")))
        .or_else(|| parse_full_date(&format!("{s} 1")))
        .or_else(|| parse_full_date(&format!("1 {s}")))
        .or_else(|| parse_year(s))
}

fn parse_full_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn parse_year(s: &str) -> Option<NaiveDate> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Write `contents` as `metadata.csv` in a fresh temp dir.
    pub(crate) fn write_csv(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    /// Small table used by the processor and stats tests.
    pub(crate) fn sample_papers() -> DataFrame {
        let (_dir, path) = write_csv(
            "cord_uid,title,publish_time,journal,abstract\n\
             a1,Coronavirus spread in bats,2019-05-01,Virology,Bats carry many viruses\n\
             a2,SARS-CoV-2 vaccine trials,2020-03-15,Lancet,Phase one results\n\
             a3,Masks and transmission,2020-07-01,BMJ,\n\
             a4,Vaccine hesitancy survey,2021,Lancet,Survey of adults in three countries\n",
        );
        load_papers(&path).unwrap()
    }

    #[test]
    fn test_parse_publish_date_formats() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(parse_publish_date("2020-03-15"), d(2020, 3, 15));
        assert_eq!(parse_publish_date(" 2020-03-15 00:00:00 "), d(2020, 3, 15));
        assert_eq!(parse_publish_date("2020-03-15T12:30:00"), d(2020, 3, 15));
        assert_eq!(parse_publish_date("2020/03/15"), d(2020, 3, 15));
        assert_eq!(parse_publish_date("03/15/2020"), d(2020, 3, 15));
        assert_eq!(parse_publish_date("2020 Mar 15"), d(2020, 3, 15));
        assert_eq!(parse_publish_date("2020 Mar"), d(2020, 3, 1));
        assert_eq!(parse_publish_date("Mar 2020"), d(2020, 3, 1));
        assert_eq!(parse_publish_date("2020-03"), d(2020, 3, 1));
        assert_eq!(parse_publish_date("2020"), d(2020, 1, 1));
    }

    #[test]
    fn test_parse_publish_date_rejects_garbage() {
        assert_eq!(parse_publish_date(""), None);
        assert_eq!(parse_publish_date("   "), None);
        assert_eq!(parse_publish_date("unknown"), None);
        assert_eq!(parse_publish_date("2020-13-45"), None);
        assert_eq!(parse_publish_date("20201"), None);
    }

    #[test]
    fn test_abstract_word_count() {
        assert_eq!(abstract_word_count(None), 0);
        assert_eq!(abstract_word_count(Some("")), 0);
        assert_eq!(abstract_word_count(Some("  one\ttwo \n three ")), 3);
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let (_dir, path) = write_csv(
            "title,publish_time,journal,abstract,extra\n\
             Kept paper,2020-01-02,J1,one two three,x\n\
             ,2020-01-02,J1,no title,x\n\
             No date,,J2,missing date,x\n\
             Bad date,not a date,J2,bad,x\n\
             Year only,2021,,,x\n",
        );

        let df = load_papers(&path).unwrap();
        assert_eq!(df.height(), 2);

        let titles: Vec<Option<&str>> = df.column(TITLE).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(titles, vec![Some("Kept paper"), Some("Year only")]);

        let years: Vec<Option<i32>> = df.column(YEAR).unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2020), Some(2021)]);

        let counts: Vec<Option<u32>> = df
            .column(ABSTRACT_WORD_COUNT)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(3), Some(0)]);

        assert_eq!(df.column(PUBLISH_TIME).unwrap().dtype(), &DataType::Date);
        assert!(df.get_column_index("extra").is_some());
    }

    #[test]
    fn test_cleaned_rows_have_title_and_date() {
        let df = sample_papers();
        assert_eq!(df.height(), 4);
        assert_eq!(df.column(TITLE).unwrap().null_count(), 0);
        assert_eq!(df.column(PUBLISH_TIME).unwrap().null_count(), 0);
        assert_eq!(df.column(YEAR).unwrap().null_count(), 0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_papers(&dir.path().join("metadata.csv"));
        assert!(matches!(result, Err(LoaderError::NotFound(_))));
    }

    #[test]
    fn test_full_dates_after_long_run_of_bare_years_are_kept() {
        let mut csv = String::from("title,publish_time,journal,abstract\n");
        for i in 0..10_001 {
            csv.push_str(&format!("Paper {i},2020,J,text\n"));
        }
        csv.push_str("Late paper,2021-03-15,J,text\n");
        let (_dir, path) = write_csv(&csv);

        let df = load_papers(&path).unwrap();
        assert_eq!(df.height(), 10_002);
        let years = df.column(YEAR).unwrap().i32().unwrap();
        assert_eq!(years.max(), Some(2021));
        assert_eq!(df.column(TITLE).unwrap().str().unwrap().get(10_001), Some("Late paper"));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let (_dir, path) = write_csv("title,publish_time,abstract\nA,2020,text\n");
        let result = load_papers(&path);
        assert!(matches!(result, Err(LoaderError::MissingColumn(JOURNAL))));
    }

    #[test]
    fn test_cached_load_returns_same_table() {
        let (_dir, path) = write_csv("title,publish_time,journal,abstract\nA,2020,J,text\n");
        let first = load_papers_cached(&path).unwrap();
        let second = load_papers_cached(Path::new("does-not-exist.csv")).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.height(), 1);
    }
}
