//! Statistics Calculator Module
//! Descriptive aggregates over a filtered paper table: papers per year,
//! top journals and title word frequencies.

use crate::config::AppConfig;
use crate::data::{DataProcessor, ProcessorError, SampleRow, JOURNAL, TITLE, YEAR};
use once_cell::sync::Lazy;
use polars::prelude::*;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Tokens of two or more word characters, apostrophes allowed after the first.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w']+").expect("valid word regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

const STOPWORD_LIST: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm", "i've",
    "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't",
    "since", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd", "they'll",
    "they're", "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's",
    "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've",
    "your", "yours", "yourself", "yourselves",
];

/// Number of papers published in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: u32,
}

/// Number of papers published in one journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalCount {
    pub journal: String,
    pub count: u32,
}

/// A word and how often it appears across titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrequency {
    pub word: String,
    pub count: u32,
}

/// Everything the chart viewer shows for one filtered table.
#[derive(Debug, Clone, Default)]
pub struct PaperSummary {
    pub total: usize,
    pub year_counts: Vec<YearCount>,
    pub top_journals: Vec<JournalCount>,
    /// `None` when there is no title text to draw a word cloud from.
    pub word_frequencies: Option<Vec<WordFrequency>>,
    pub sample: Vec<SampleRow>,
}

impl PaperSummary {
    /// Compute all aggregates, counting title words in parallel with the rest.
    pub fn compute(df: &DataFrame, config: &AppConfig) -> Result<Self, ProcessorError> {
        let (words, rest) = rayon::join(
            || StatsCalculator::title_word_frequencies(df, config.word_cloud.max_words),
            || -> Result<_, ProcessorError> {
                Ok((
                    StatsCalculator::year_counts(df)?,
                    StatsCalculator::top_journals(df, config.top_journals)?,
                    DataProcessor::sample_rows(df, config.sample_rows)?,
                ))
            },
        );
        let (year_counts, top_journals, sample) = rest?;

        Ok(Self {
            total: df.height(),
            year_counts,
            top_journals,
            word_frequencies: words?,
            sample,
        })
    }
}

/// Aggregation functions over cleaned paper tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Papers per year, ascending by year. Null years are not counted.
    pub fn year_counts(df: &DataFrame) -> Result<Vec<YearCount>, ProcessorError> {
        let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
        for year in df.column(YEAR)?.i32()?.into_iter().flatten() {
            *counts.entry(year).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect())
    }

    /// The `limit` most frequent journals, most papers first.
    ///
    /// Missing or blank journal names are ignored. Ties are ordered by name.
    pub fn top_journals(df: &DataFrame, limit: usize) -> Result<Vec<JournalCount>, ProcessorError> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for journal in df.column(JOURNAL)?.str()?.into_iter().flatten() {
            if !journal.trim().is_empty() {
                *counts.entry(journal).or_default() += 1;
            }
        }

        let mut ranked: Vec<JournalCount> = counts
            .into_iter()
            .map(|(journal, count)| JournalCount {
                journal: journal.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.journal.cmp(&b.journal)));
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Word frequencies of all titles, at most `max_words` entries, most
    /// frequent first.
    ///
    /// Returns `None` when the joined title text is blank or nothing is left
    /// after stop words are removed.
    pub fn title_word_frequencies(
        df: &DataFrame,
        max_words: usize,
    ) -> Result<Option<Vec<WordFrequency>>, ProcessorError> {
        let titles: Vec<&str> = df.column(TITLE)?.str()?.into_iter().flatten().collect();
        Ok(Self::word_frequencies(&titles, max_words))
    }

    /// Tokenize `texts` and count words case-insensitively.
    pub fn word_frequencies(texts: &[&str], max_words: usize) -> Option<Vec<WordFrequency>> {
        if texts.iter().all(|t| t.trim().is_empty()) {
            return None;
        }

        // Exact-case counts, merged across rayon workers.
        let raw: HashMap<String, u32> = texts
            .par_iter()
            .fold(HashMap::new, |mut acc: HashMap<String, u32>, text| {
                for token in Self::tokenize(text) {
                    *acc.entry(token).or_default() += 1;
                }
                acc
            })
            .reduce(HashMap::new, |mut a, b| {
                for (word, count) in b {
                    *a.entry(word).or_default() += count;
                }
                a
            });

        // Group case variants under their lowercase form.
        let mut grouped: HashMap<String, (u32, HashMap<String, u32>)> = HashMap::new();
        for (word, count) in raw {
            let entry = grouped.entry(word.to_lowercase()).or_default();
            entry.0 += count;
            entry.1.insert(word, count);
        }

        // Fold "vaccines" into "vaccine" when both occur.
        let plurals: Vec<String> = grouped
            .keys()
            .filter(|k| k.ends_with('s') && !k.ends_with("ss"))
            .filter(|k| grouped.contains_key(&k[..k.len() - 1]))
            .cloned()
            .collect();
        for plural in plurals {
            if let Some((count, _)) = grouped.remove(&plural) {
                if let Some(singular) = grouped.get_mut(&plural[..plural.len() - 1]) {
                    singular.0 += count;
                }
            }
        }

        let mut words: Vec<WordFrequency> = grouped
            .into_values()
            .map(|(count, variants)| {
                // Display the most common casing, ties resolved alphabetically.
                let word = variants
                    .into_iter()
                    .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                    .map(|(w, _)| w)
                    .unwrap_or_default();
                WordFrequency { word, count }
            })
            .collect();

        if words.is_empty() {
            return None;
        }

        words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        words.truncate(max_words);
        Some(words)
    }

    /// Split text into candidate words, dropping numbers and stop words.
    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        WORD_RE.find_iter(text).filter_map(|m| {
            let token = m.as_str();
            let token = if token.to_lowercase().ends_with("'s") {
                &token[..token.len() - 2]
            } else {
                token
            };
            let lower = token.to_lowercase();
            if token.chars().all(|c| c.is_numeric()) || STOPWORDS.contains(lower.as_str()) {
                None
            } else {
                Some(token.to_string())
            }
        })
    }
}
