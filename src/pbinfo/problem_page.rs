//! Extraction of a [`Problem`] from its page.

use std::sync::LazyLock;

use html_scraper::{ElementRef, Html, Selector};

use super::columns;
use super::errors::StructureError;
use super::models::Problem;
use super::normalize::normalize_text;
use crate::html::element_text;

static METADATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[name="section-restrictii"] + table"#).unwrap());
static METADATA_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody > tr > td").unwrap());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1.text-primary > a").unwrap());

/// Parse the problem page `body` into a record for problem `id`.
pub(crate) fn parse_problem(body: &str, id: u32) -> Result<Problem, StructureError> {
    let html = Html::parse_document(body);
    let mut problem = Problem::new(id);

    let table = html
        .select(&METADATA_TABLE)
        .next()
        .ok_or(StructureError::MissingMetadataTable)?;
    let cells: Vec<ElementRef<'_>> = table.select(&METADATA_CELLS).collect();
    columns::apply(&cells, &mut problem)?;

    let title = html
        .select(&TITLE)
        .next()
        .ok_or(StructureError::MissingTitle)?;
    problem.name = normalize_text(&element_text(title)).to_string();

    Ok(problem)
}
