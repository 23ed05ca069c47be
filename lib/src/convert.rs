use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Map;

use crate::catalog::Catalog;
use crate::data::{QuestionOption, QuestionRecord};
use crate::raw_row::{Cell, RawRow};
use crate::resolver::{resolve_category, resolve_question_type, CATEGORY_PREFIX};

pub const QUESTION_TYPE_COLUMNS: &[&str] = &["Question Type", "question_type", "Type"];
pub const CATEGORY_COLUMNS: &[&str] = &["Category", "Category Id", "category"];
pub const QUESTION_TEXT_COLUMNS: &[&str] = &["Question", "Question Text", "question_text"];
pub const CONCEPT_COLUMNS: &[&str] = &["Concepts", "concepts", "Concept"];
pub const DIFFICULTY_COLUMNS: &[&str] = &["Difficulty Level", "difficulty_level", "Difficulty"];
pub const MAX_SCORE_COLUMNS: &[&str] = &["Max Score", "max_score", "Score"];
pub const TIME_LIMIT_COLUMNS: &[&str] = &["Time Limit", "time_limit"];
pub const CORRECT_ANSWER_COLUMNS: &[&str] = &[
    "Correct Answer",
    "Correct Answers",
    "correct_answers",
    "Answer",
];
pub const EXPLANATION_COLUMNS: &[&str] = &["Explanation", "explanation"];

/// Option columns looked up first, in this order.
pub const OPTION_COLUMNS: &[&str] = &[
    "Option 1",
    "Option 2",
    "Option 3",
    "Option 4",
    "Option 5",
    "Option 6",
    "Option 1.1",
    "Option 2.1",
];

pub const DEFAULT_DIFFICULTY_LEVEL: u32 = 1;
pub const DEFAULT_MAX_SCORE: f64 = 1.0;
pub const DEFAULT_TIME_LIMIT: u32 = 60;

/// Header row offset: the first data row is spreadsheet row 2.
const HEADER_ROWS: usize = 1;

static OPTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^option\s*\d+$").expect("option header pattern is valid"));

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The row was left out of the batch.
    Error,
    /// The row was kept but needs a second look.
    Warning,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ConversionIssue {
    pub row: usize,
    pub severity: Severity,
    pub message: String,
}

impl ConversionIssue {
    pub fn error(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowOutcome {
    pub record: Option<QuestionRecord>,
    pub issues: Vec<ConversionIssue>,
}

/// Converts one spreadsheet row into a question record.
///
/// A rejected row yields no record and exactly one error issue. An accepted
/// row may still carry warnings.
pub fn convert_row(row: &RawRow, row_number: usize, catalog: &Catalog) -> RowOutcome {
    let mut warnings = Vec::new();

    match build_record(row, catalog, &mut warnings) {
        Ok(record) => RowOutcome {
            record: Some(record),
            issues: warnings
                .into_iter()
                .map(|message| ConversionIssue::warning(row_number, message))
                .collect(),
        },
        Err(message) => RowOutcome {
            record: None,
            issues: vec![ConversionIssue::error(row_number, message)],
        },
    }
}

fn build_record(
    row: &RawRow,
    catalog: &Catalog,
    warnings: &mut Vec<String>,
) -> Result<QuestionRecord, String> {
    let type_value = text_of(row, QUESTION_TYPE_COLUMNS).ok_or("Missing question type")?;
    let question_type = resolve_question_type(&type_value, catalog)
        .ok_or_else(|| format!("Unknown question type {type_value:?}"))?;

    let category_id = match text_of(row, CATEGORY_COLUMNS) {
        Some(value) => match resolve_category(&value, catalog) {
            Some(category) => category.id.clone(),
            None if value.starts_with(CATEGORY_PREFIX) => value,
            None => return Err(format!("Unknown category {value:?}")),
        },
        None if !question_type.category_id.trim().is_empty() => {
            question_type.category_id.clone()
        }
        None => {
            return Err(format!(
                "No category given and question type {:?} has no default category",
                type_value
            ))
        }
    };

    let question_text = text_of(row, QUESTION_TEXT_COLUMNS).ok_or("Missing question text")?;

    let concepts = row
        .first_non_empty(CONCEPT_COLUMNS)
        .map(|cell| cell.to_list(&[',']))
        .unwrap_or_default();

    let answers = row
        .first_non_empty(CORRECT_ANSWER_COLUMNS)
        .map(|cell| cell.to_list(&[',', ';']))
        .unwrap_or_default();
    let expected: Vec<String> = answers.iter().map(|answer| answer.to_lowercase()).collect();

    let options: Vec<QuestionOption> = collect_options(row)
        .into_iter()
        .zip(1..)
        .map(|(text, order)| {
            let is_correct = expected.contains(&text.to_lowercase());

            QuestionOption::new(text, is_correct, order)
        })
        .collect();

    let correct_answers: Vec<String> = options
        .iter()
        .filter(|option| option.is_correct)
        .map(|option| option.text.clone())
        .collect();

    if !answers.is_empty() && correct_answers.is_empty() {
        warnings.push(format!(
            "Correct answer {:?} does not match any option; the correct answer should exactly match an option's text",
            answers.join(", ")
        ));
    }

    Ok(QuestionRecord {
        question_type_id: question_type.id.clone(),
        category_id,
        question_text,
        concepts,
        difficulty_level: whole_or(row, DIFFICULTY_COLUMNS, DEFAULT_DIFFICULTY_LEVEL),
        max_score: positive_or(row, MAX_SCORE_COLUMNS, DEFAULT_MAX_SCORE),
        time_limit: whole_or(row, TIME_LIMIT_COLUMNS, DEFAULT_TIME_LIMIT),
        options,
        correct_answers,
        explanation: text_of(row, EXPLANATION_COLUMNS).unwrap_or_default(),
        hints: Vec::new(),
        tags: Vec::new(),
        media: Vec::new(),
        metadata: Map::new(),
    })
}

fn text_of(row: &RawRow, headers: &[&str]) -> Option<String> {
    row.first_non_empty(headers).and_then(Cell::as_text)
}

fn positive_or(row: &RawRow, headers: &[&str], default: f64) -> f64 {
    row.first_non_empty(headers)
        .and_then(Cell::as_number)
        .filter(|number| number.is_finite() && *number > 0.0)
        .unwrap_or(default)
}

fn whole_or(row: &RawRow, headers: &[&str], default: u32) -> u32 {
    let number = positive_or(row, headers, f64::from(default)).round();

    if number < 1.0 || number > f64::from(u32::MAX) {
        default
    } else {
        number as u32
    }
}

/// Option texts in column order.
///
/// The known option columns are used when any of them has a value; otherwise
/// every `Option <n>` column is taken in the order it appears in the sheet.
fn collect_options(row: &RawRow) -> Vec<String> {
    let known: Vec<&Cell> = OPTION_COLUMNS
        .iter()
        .filter_map(|header| row.get(header))
        .filter(|cell| !cell.is_empty())
        .collect();

    let cells = if known.is_empty() {
        row.iter()
            .filter(|(header, _)| OPTION_HEADER.is_match(header.trim()))
            .map(|(_, cell)| cell)
            .collect()
    } else {
        known
    };

    cells.into_iter().filter_map(Cell::as_text).collect()
}

/// Result of converting a whole sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionReport {
    /// Accepted records, in row order.
    pub questions: Vec<QuestionRecord>,
    /// Every error and warning, in row order.
    pub issues: Vec<ConversionIssue>,
    /// Non-blank rows seen.
    pub total_rows: usize,
}

impl ConversionReport {
    pub fn accepted(&self) -> usize {
        self.questions.len()
    }

    pub fn rejected(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.rejected() > 0
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }
}

/// Converts every row of a sheet, in order.
///
/// Blank rows are skipped without an issue. Row numbers in issues are
/// spreadsheet row numbers, counting the header row.
pub fn convert_rows(rows: &[RawRow], catalog: &Catalog) -> ConversionReport {
    let mut report = ConversionReport::default();

    for (index, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }

        let row_number = index + 1 + HEADER_ROWS;
        report.total_rows += 1;

        let outcome = convert_row(row, row_number, catalog);

        for issue in &outcome.issues {
            if issue.is_error() {
                tracing::warn!(row = issue.row, "Skipping row: {}", issue.message);
            } else {
                tracing::debug!(row = issue.row, "Row warning: {}", issue.message);
            }
        }

        report.issues.extend(outcome.issues);
        report.questions.extend(outcome.record);
    }

    tracing::info!(
        total = report.total_rows,
        accepted = report.accepted(),
        rejected = report.rejected(),
        "Converted question rows"
    );

    report
}
