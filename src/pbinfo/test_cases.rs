//! Extraction of test cases from the test listing and from problem pages.

use std::fmt;
use std::sync::LazyLock;

use html_scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use super::errors::StructureError;
use super::models::TestCase;
use super::normalize::normalize_text;
use crate::html::{child_attr, child_text, element_text};

static LISTING_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table > tbody > tr").unwrap());
static CELLS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static INLINE_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("textarea").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static EXAMPLES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p + pre").unwrap());

/// Listing column holding the case score.
const SCORE_COLUMN: usize = 1;
const INPUT_COLUMN: usize = 2;
const EXPECTED_COLUMN: usize = 3;
const EXAMPLE_COLUMN: usize = 4;

/// Text of the example column for public cases.
const EXAMPLE_MARKER: &str = "da";

/// Which side of a test case a chunk fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkRole {
    Input,
    Expected,
}

/// A listing row whose contents may still be waiting on downloads.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct PartialCase {
    pub input: Option<Vec<u8>>,
    pub expected: Option<Vec<u8>>,
    pub is_example: bool,
    pub score: i64,
}

impl PartialCase {
    pub fn fill(&mut self, role: ChunkRole, content: Vec<u8>) {
        match role {
            ChunkRole::Input => self.input = Some(content),
            ChunkRole::Expected => self.expected = Some(content),
        }
    }

    fn complete(self) -> Option<TestCase> {
        Some(TestCase {
            input: self.input?,
            expected: self.expected?,
            is_example: self.is_example,
            score: self.score,
        })
    }
}

/// Content that is only linked from the listing and must be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingChunk {
    /// Index into [`Listing::rows`] the download belongs to.
    pub row: usize,
    pub role: ChunkRole,
    pub url: Url,
}

impl PendingChunk {
    fn query(&self, key: &str) -> String {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    }
}

/// Labels a chunk by the `id`/`tip` query values of its download link.
impl fmt::Display for PendingChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.query("id"), self.query("tip"))
    }
}

/// Parsed test listing: one entry per row, in document order.
#[derive(Debug, Default)]
pub(crate) struct Listing {
    pub rows: Vec<PartialCase>,
    pub pending: Vec<PendingChunk>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Collect every row into complete test cases, or `None` if any row lacks
/// its input or expected output.
pub(crate) fn assemble(rows: Vec<PartialCase>) -> Option<Vec<TestCase>> {
    rows.into_iter().map(PartialCase::complete).collect()
}

/// Parse the test listing. Download links are resolved against `base`.
pub(crate) fn parse_listing(body: &str, base: &Url) -> Listing {
    let html = Html::parse_document(body);
    let mut listing = Listing::default();

    for row in html.select(&LISTING_ROWS) {
        let index = listing.rows.len();
        let mut case = PartialCase::default();

        for (column, cell) in row.select(&CELLS).enumerate() {
            match column {
                SCORE_COLUMN => case.score = parse_score(cell),
                INPUT_COLUMN | EXPECTED_COLUMN => {
                    let role = if column == INPUT_COLUMN {
                        ChunkRole::Input
                    } else {
                        ChunkRole::Expected
                    };

                    let content = child_text(cell, &INLINE_CONTENT);
                    if !content.is_empty() {
                        case.fill(role, content.into_bytes());
                    } else if let Some(url) = chunk_url(cell, base) {
                        listing.pending.push(PendingChunk { row: index, role, url });
                    } else {
                        warn!(row = index, ?role, "Test content is neither inline nor linked");
                    }
                }
                EXAMPLE_COLUMN => {
                    case.is_example = normalize_text(&element_text(cell)) == EXAMPLE_MARKER;
                }
                _ => {}
            }
        }

        listing.rows.push(case);
    }

    listing
}

fn parse_score(cell: ElementRef<'_>) -> i64 {
    let text = element_text(cell);
    let text = normalize_text(&text);
    if text.is_empty() {
        return 0;
    }
    text.parse().unwrap_or_else(|_| {
        warn!(raw = text, "Unparsable test score, using 0");
        0
    })
}

fn chunk_url(cell: ElementRef<'_>, base: &Url) -> Option<Url> {
    let href = child_attr(cell, &LINK, "href")?.trim();
    if href.is_empty() {
        return None;
    }
    match base.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(href, error = %e, "Unresolvable test download link");
            None
        }
    }
}

/// Pair up the example blocks of a problem page (`p + pre`, input then output).
pub(crate) fn parse_examples(body: &str) -> Result<Vec<TestCase>, StructureError> {
    let html = Html::parse_document(body);
    let blocks: Vec<String> = html.select(&EXAMPLES).map(element_text).collect();

    if blocks.len() % 2 != 0 {
        return Err(StructureError::UnpairedExamples {
            count: blocks.len(),
        });
    }

    Ok(blocks
        .chunks_exact(2)
        .map(|pair| TestCase {
            input: pair[0].clone().into_bytes(),
            expected: pair[1].clone().into_bytes(),
            is_example: true,
            score: 0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.pbinfo.ro").unwrap()
    }

    fn listing(rows: &str) -> String {
        format!(
            "<html><body><table class=\"table\"><thead><tr><th>#</th><th>Punctaj</th>\
             <th>Intrare</th><th>Ieșire</th><th>Exemplu</th></tr></thead>\
             <tbody>{rows}</tbody></table></body></html>"
        )
    }

    #[test]
    fn test_inline_rows() {
        let body = listing(
            "<tr><td>1</td><td>10</td><td><textarea>1 2</textarea></td><td><textarea>3</textarea></td><td>Da</td></tr>\
             <tr><td>2</td><td>90</td><td><textarea>5 5</textarea></td><td><textarea>10</textarea></td><td>Nu</td></tr>",
        );
        let parsed = parse_listing(&body, &base());

        assert!(parsed.pending.is_empty());
        let cases = assemble(parsed.rows).unwrap();
        assert_eq!(
            cases,
            vec![
                TestCase {
                    input: b"1 2".to_vec(),
                    expected: b"3".to_vec(),
                    is_example: false,
                    score: 10
                },
                TestCase {
                    input: b"5 5".to_vec(),
                    expected: b"10".to_vec(),
                    is_example: false,
                    score: 90
                },
            ]
        );
    }

    #[test]
    fn test_example_marker_is_lowercase_da() {
        let body = listing(
            "<tr><td>1</td><td>0</td><td><textarea>1</textarea></td><td><textarea>1</textarea></td><td> da </td></tr>",
        );
        let rows = parse_listing(&body, &base()).rows;
        assert!(rows[0].is_example);
    }

    #[test]
    fn test_linked_rows_are_queued() {
        let body = listing(
            r#"<tr><td>1</td><td>20</td>
                <td><a href="/php/descarca-test.php?id=5001&amp;tip=in">descarcă</a></td>
                <td><textarea>42</textarea></td><td>-</td></tr>
               <tr><td>2</td><td>80</td>
                <td><a href="/php/descarca-test.php?id=5002&amp;tip=in">descarcă</a></td>
                <td><a href="https://cdn.pbinfo.ro/teste/5002.ok">descarcă</a></td><td>-</td></tr>"#,
        );
        let parsed = parse_listing(&body, &base());

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].expected.as_deref(), Some(&b"42"[..]));
        assert_eq!(parsed.rows[0].input, None);

        let pending: Vec<(usize, ChunkRole, &str)> = parsed
            .pending
            .iter()
            .map(|p| (p.row, p.role, p.url.as_str()))
            .collect();
        assert_eq!(
            pending,
            vec![
                (0, ChunkRole::Input, "https://www.pbinfo.ro/php/descarca-test.php?id=5001&tip=in"),
                (1, ChunkRole::Input, "https://www.pbinfo.ro/php/descarca-test.php?id=5002&tip=in"),
                (1, ChunkRole::Expected, "https://cdn.pbinfo.ro/teste/5002.ok"),
            ]
        );
        assert_eq!(parsed.pending[0].to_string(), "5001 (in)");
    }

    #[test]
    fn test_no_rows() {
        let parsed = parse_listing("<html><body><p>Nu există teste.</p></body></html>", &base());
        assert!(parsed.is_empty());
        assert!(parsed.pending.is_empty());
    }

    #[test]
    fn test_assemble_rejects_partial_rows() {
        let mut complete = PartialCase::default();
        complete.fill(ChunkRole::Input, b"1".to_vec());
        complete.fill(ChunkRole::Expected, b"2".to_vec());
        let mut missing_expected = PartialCase::default();
        missing_expected.fill(ChunkRole::Input, b"1".to_vec());

        assert_eq!(assemble(vec![complete, missing_expected]), None);
        assert_eq!(assemble(Vec::new()), Some(Vec::new()));
    }

    #[test]
    fn test_empty_inline_content_without_link_stays_missing() {
        let body = listing(
            "<tr><td>1</td><td>10</td><td><textarea></textarea></td><td><textarea>3</textarea></td><td>-</td></tr>",
        );
        let parsed = parse_listing(&body, &base());
        assert!(parsed.pending.is_empty());
        assert_eq!(assemble(parsed.rows), None);
    }

    #[test]
    fn test_unparsable_score_is_zero() {
        let body = listing(
            "<tr><td>1</td><td>zece</td><td><textarea>1</textarea></td><td><textarea>1</textarea></td><td>-</td></tr>",
        );
        assert_eq!(parse_listing(&body, &base()).rows[0].score, 0);
    }

    #[test]
    fn test_parse_examples_pairs() {
        let body = "<html><body>\
            <p>Cerința</p><div>...</div>\
            <p>nrapprime.in</p><pre>5\n1 2 3 4 5</pre>\
            <p>nrapprime.out</p><pre>3</pre>\
            <p>Exemplul 2 intrare</p><pre>1\n7</pre>\
            <p>Exemplul 2 ieșire</p><pre>1</pre>\
            </body></html>";
        let cases = parse_examples(body).unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].input, b"5\n1 2 3 4 5");
        assert_eq!(cases[0].expected, b"3");
        assert_eq!(cases[1].input, b"1\n7");
        assert!(cases.iter().all(|c| c.is_example && c.score == 0));
    }

    #[test]
    fn test_parse_examples_ignores_pre_without_paragraph() {
        let body = "<html><body><div>x</div><pre>lonely</pre><p>in</p><pre>1</pre><p>out</p><pre>2</pre></body></html>";
        let cases = parse_examples(body).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].input, b"1");
    }

    #[test]
    fn test_parse_examples_odd_count() {
        let body = "<html><body><p>in</p><pre>1</pre><p>out</p><pre>2</pre><p>in</p><pre>3</pre></body></html>";
        assert_eq!(
            parse_examples(body).unwrap_err(),
            StructureError::UnpairedExamples { count: 3 }
        );
    }

    #[test]
    fn test_parse_examples_none() {
        assert_eq!(parse_examples("<html><body></body></html>").unwrap(), Vec::new());
    }
}
