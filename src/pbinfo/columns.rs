//! Column parsers for the restrictions table on a problem page.
//!
//! The table has one row and a fixed column order. Each [`Column`] names the
//! position it is bound to; [`COLUMNS`] must list them in that order, which
//! is checked at compile time.

use std::sync::LazyLock;

use html_scraper::{ElementRef, Selector};
use tracing::{trace, warn};

use super::errors::StructureError;
use super::models::{IoStream, Problem, ProblemDifficulty};
use super::normalize::{fold_diacritics, normalize_text, parse_human_size, parse_seconds};
use crate::html::{child_text, element_text};

static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static MEMORY_TOTAL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[title="Memorie totală"]"#).unwrap());
static STACK_SIZE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[title="Dimensiunea stivei"]"#).unwrap());

/// Input/output words meaning the standard streams, compared diacritic-folded.
const KEYBOARD_WORD: &str = "tastatura";
const SCREEN_WORD: &str = "ecran";

/// A parser bound to one column of the restrictions table.
pub(crate) struct Column {
    pub index: usize,
    pub label: &'static str,
    parse: fn(ElementRef<'_>, &mut Problem),
}

/// Columns present on every problem page.
pub(crate) const REQUIRED_COLUMNS: usize = 8;

/// The full table; the last column (the caller's score) only appears when
/// the viewer has submitted a solution.
pub(crate) const COLUMNS: [Column; 9] = [
    Column { index: 0, label: "publisher", parse: parse_publisher },
    Column { index: 1, label: "grade", parse: parse_grade },
    Column { index: 2, label: "input/output", parse: parse_io },
    Column { index: 3, label: "time limit", parse: parse_time_limit },
    Column { index: 4, label: "memory limits", parse: parse_memory_limits },
    Column { index: 5, label: "source", parse: parse_source },
    Column { index: 6, label: "authors", parse: parse_authors },
    Column { index: 7, label: "difficulty", parse: parse_difficulty },
    Column { index: 8, label: "score", parse: parse_score },
];

const _: () = {
    let mut position = 0;
    while position < COLUMNS.len() {
        assert!(COLUMNS[position].index == position, "COLUMNS must be listed in column order");
        position += 1;
    }
};

/// Run every column parser over its cell, in order.
///
/// Fails only when the number of cells shows the table layout changed;
/// malformed individual cells leave their field untouched.
pub(crate) fn apply(cells: &[ElementRef<'_>], problem: &mut Problem) -> Result<(), StructureError> {
    let found = cells.len();
    if !(REQUIRED_COLUMNS..=COLUMNS.len()).contains(&found) {
        return Err(StructureError::ColumnCount {
            found,
            min: REQUIRED_COLUMNS,
            max: COLUMNS.len(),
        });
    }

    for (cell, column) in cells.iter().zip(COLUMNS.iter()) {
        trace!(column = column.label, "Applying column parser");
        (column.parse)(*cell, problem);
    }

    Ok(())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    normalize_text(&element_text(cell)).to_string()
}

fn parse_publisher(cell: ElementRef<'_>, problem: &mut Problem) {
    problem.publisher = child_text(cell, &SPAN);
}

fn parse_grade(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = cell_text(cell);
    if text.is_empty() {
        return;
    }
    match text.parse() {
        Ok(grade) => problem.grade = grade,
        Err(_) => warn!(column = "grade", raw = %text, "Unparsable grade, leaving unset"),
    }
}

fn parse_io(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = child_text(cell, &SPAN);
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();

    let [input, output] = parts.as_slice() else {
        warn!(column = "input/output", raw = %text, "Expected 'input / output'");
        problem.input = IoStream::Unresolved;
        problem.output = IoStream::Unresolved;
        return;
    };

    if fold_diacritics(input) == KEYBOARD_WORD || fold_diacritics(output) == SCREEN_WORD {
        problem.input = IoStream::Unresolved;
        problem.output = IoStream::Unresolved;
        return;
    }

    problem.input = IoStream::file(*input);
    problem.output = IoStream::file(*output);
}

fn parse_time_limit(cell: ElementRef<'_>, problem: &mut Problem) {
    if let Some(limit) = parse_seconds(&cell_text(cell)) {
        problem.max_time = limit;
    }
}

fn parse_memory_limits(cell: ElementRef<'_>, problem: &mut Problem) {
    if let Some(bytes) = parse_human_size(&child_text(cell, &MEMORY_TOTAL)) {
        problem.max_memory_bytes = bytes;
    }
    if let Some(bytes) = parse_human_size(&child_text(cell, &STACK_SIZE)) {
        problem.max_stack_bytes = bytes;
    }
}

fn parse_source(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = cell_text(cell);
    if !text.is_empty() {
        problem.source = text;
    }
}

fn parse_authors(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = cell_text(cell);
    if text.is_empty() {
        problem.authors.clear();
        return;
    }
    problem.authors = text.split(',').map(|author| author.trim().to_string()).collect();
}

fn parse_difficulty(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = cell_text(cell);
    problem.difficulty = ProblemDifficulty::parse(&text);
    if problem.difficulty == ProblemDifficulty::Unknown && !text.is_empty() {
        warn!(column = "difficulty", raw = %text, "Unrecognized difficulty");
    }
}

fn parse_score(cell: ElementRef<'_>, problem: &mut Problem) {
    let text = cell_text(cell);
    if text.is_empty() {
        return;
    }
    match text.parse() {
        Ok(score) => problem.score = Some(score),
        Err(_) => warn!(column = "score", raw = %text, "Unparsable score, leaving unset"),
    }
}
