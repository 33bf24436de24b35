//! Question file loading.
//!
//! CSV is the primary format; files ending in `.json` are read as a JSON
//! array instead. Rows that fail validation are skipped and logged, they
//! never abort the load.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{QuestionRecord, ValidationError};

/// Column names every CSV question file must carry, with accepted aliases.
const REQUIRED_COLUMNS: [&[&str]; 6] = [
    &["Category"],
    &["Subcategory", "Sub_Category"],
    &["Question"],
    &["Option A"],
    &["Option B"],
    &["Correct Option", "Answer"],
];

/// Error type for question loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no valid questions found")]
    NoQuestions,
}

/// Counters describing one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    pub loaded: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Subcategory", alias = "Sub_Category")]
    subcategory: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Option A")]
    option_a: String,
    #[serde(rename = "Option B")]
    option_b: String,
    #[serde(rename = "Option C", default)]
    option_c: Option<String>,
    #[serde(rename = "Option D", default)]
    option_d: Option<String>,
    #[serde(rename = "Correct Option", alias = "Answer")]
    answer: String,
    #[serde(rename = "Timer", default)]
    timer: Option<String>,
    #[serde(rename = "Explanation", alias = "explaination", default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonQuestion {
    category: String,
    subcategory: String,
    question: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    timer: Option<u32>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Why a single row was dropped.
#[derive(Debug, Error)]
enum RowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("timer '{0}' is not a whole number of seconds")]
    BadTimer(String),
}

/// Accumulates validated records, dropping duplicates by question text.
#[derive(Default)]
struct Collector {
    questions: Vec<QuestionRecord>,
    seen: HashSet<String>,
    summary: LoadSummary,
}

impl Collector {
    fn accept(&mut self, row: usize, built: Result<QuestionRecord, RowError>) {
        self.summary.rows += 1;
        let question = match built {
            Ok(question) => question,
            Err(e) => {
                warn!(row, error = %e, "Skipping invalid question row");
                self.summary.skipped += 1;
                return;
            }
        };

        if !self.seen.insert(question.text().to_lowercase()) {
            warn!(row, question = question.text(), "Skipping duplicate question");
            self.summary.duplicates += 1;
            return;
        }

        self.questions.push(question);
        self.summary.loaded += 1;
    }

    fn reject(&mut self, row: usize, error: &dyn std::fmt::Display) {
        self.summary.rows += 1;
        self.summary.skipped += 1;
        warn!(row, error = %error, "Skipping malformed question row");
    }

    fn finish(self) -> Result<(Vec<QuestionRecord>, LoadSummary), LoadError> {
        if self.questions.is_empty() {
            return Err(LoadError::NoQuestions);
        }
        Ok((self.questions, self.summary))
    }
}

/// Load questions from a CSV or JSON file.
pub fn load_questions<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionRecord>, LoadError> {
    let path = path.as_ref();
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let (questions, summary) = if is_json {
        let content = fs::read_to_string(path).map_err(io_error)?;
        parse_json(&content)?
    } else {
        let file = File::open(path).map_err(io_error)?;
        parse_csv(file)?
    };

    info!(
        path = %path.display(),
        rows = summary.rows,
        loaded = summary.loaded,
        skipped = summary.skipped,
        duplicates = summary.duplicates,
        "Loaded questions"
    );
    Ok(questions)
}

/// Parse CSV question data from any reader.
pub fn parse_csv<R: io::Read>(reader: R) -> Result<(Vec<QuestionRecord>, LoadSummary), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    validate_header(reader.headers()?)?;

    let mut collector = Collector::default();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let row = i + 2;
        match result {
            Ok(raw) => collector.accept(row, build_from_csv(raw)),
            Err(e) => collector.reject(row, &e),
        }
    }
    collector.finish()
}

/// Parse a JSON array of questions.
pub fn parse_json(content: &str) -> Result<(Vec<QuestionRecord>, LoadSummary), LoadError> {
    let items: Vec<serde_json::Value> = serde_json::from_str(content)?;

    let mut collector = Collector::default();
    for (i, item) in items.into_iter().enumerate() {
        let row = i + 1;
        match serde_json::from_value::<JsonQuestion>(item) {
            Ok(raw) => collector.accept(row, build_from_json(raw)),
            Err(e) => collector.reject(row, &e),
        }
    }
    collector.finish()
}

fn validate_header(header: &csv::StringRecord) -> Result<(), LoadError> {
    let present: HashSet<&str> = header.iter().collect();
    debug!(?present, "CSV header");

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|names| !names.iter().any(|name| present.contains(name)))
        .map(|names| names[0].to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn build_from_csv(raw: CsvRow) -> Result<QuestionRecord, RowError> {
    // Trailing option columns may be left blank for 2- or 3-option questions.
    let options: Vec<String> = [Some(raw.option_a), Some(raw.option_b), raw.option_c, raw.option_d]
        .into_iter()
        .flatten()
        .filter(|o| !o.trim().is_empty())
        .collect();

    let timer = match raw.timer.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<u32>()
                .map_err(|_| RowError::BadTimer(value.to_string()))?,
        ),
    };

    finish_record(
        QuestionRecord::new(
            &raw.category,
            &raw.subcategory,
            &raw.question,
            options,
            &raw.answer,
        )?,
        timer,
        raw.explanation,
    )
}

fn build_from_json(raw: JsonQuestion) -> Result<QuestionRecord, RowError> {
    finish_record(
        QuestionRecord::new(
            &raw.category,
            &raw.subcategory,
            &raw.question,
            raw.options,
            &raw.answer,
        )?,
        raw.timer,
        raw.explanation,
    )
}

fn finish_record(
    mut question: QuestionRecord,
    timer: Option<u32>,
    explanation: Option<String>,
) -> Result<QuestionRecord, RowError> {
    if let Some(seconds) = timer {
        question = question.with_timer(seconds)?;
    }
    if let Some(explanation) = explanation {
        question = question.with_explanation(&explanation);
    }
    Ok(question)
}
