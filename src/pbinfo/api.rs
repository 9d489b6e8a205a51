//! pbinfo.ro client: problem lookup and test case retrieval.

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{Instrument, debug, info, info_span, trace};
use url::Url;

use super::errors::{Error, FetchError, Operation};
use super::models::{Problem, TestCase};
use super::problem_page;
use super::test_cases::{self, Listing, PendingChunk};
use super::transport::{HttpTransport, Transport};
use crate::config::Config;

/// Listing endpoint under the ajax root.
const LISTING_PAGE: &str = "ajx-problema-afisare-teste.php";

/// Client for pbinfo.ro.
///
/// Calls share nothing but the transport, so one client can serve any number
/// of concurrent lookups. Dropping a returned future aborts every request it
/// started.
#[derive(Clone)]
pub struct PbInfoClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    ajax_url: Url,
    max_concurrent_downloads: usize,
}

impl PbInfoClient {
    pub fn new(config: &Config) -> Self {
        let transport = HttpTransport::new(config.timeout, config.user_agent.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Send requests through a caller-configured `reqwest::Client`.
    pub fn with_http_client(config: &Config, client: reqwest::Client) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::with_client(client)))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            ajax_url: config.ajax_url(),
            max_concurrent_downloads: config.max_concurrent_downloads.max(1),
        }
    }

    fn problem_url(&self, id: u32) -> Url {
        endpoint(&self.base_url, &["probleme", &id.to_string()])
    }

    fn listing_url(&self, id: u32) -> Url {
        let mut url = endpoint(&self.ajax_url, &[LISTING_PAGE]);
        url.query_pairs_mut().append_pair("id", &id.to_string());
        url
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        debug!(url = %url, "Fetching page");
        let resp = self.transport.get(url).await?.error_for_status()?;
        Ok(resp.text().into_owned())
    }

    /// Fetch the problem page for `id` and extract its metadata.
    pub async fn find_problem_by_id(&self, id: u32) -> Result<Problem, Error> {
        async {
            let operation = Operation::FindProblem;
            let body = self
                .fetch_text(&self.problem_url(id))
                .await
                .map_err(|source| Error::Fetch {
                    operation,
                    id,
                    source,
                })?;

            let problem = problem_page::parse_problem(&body, id).map_err(|reason| {
                Error::Structure {
                    operation,
                    id,
                    reason,
                }
            })?;

            info!(name = %problem.name, difficulty = %problem.difficulty, "Found problem");
            Ok(problem)
        }
        .instrument(info_span!("find_problem", problem_id = id))
        .await
    }

    /// Retrieve the test cases of problem `id`.
    ///
    /// The full listing is tried first. Only when it has no rows, or a row
    /// lacks its input or expected output, are the examples on the problem
    /// page returned instead. Any request failure is returned as-is.
    pub async fn get_test_cases(&self, id: u32) -> Result<Vec<TestCase>, Error> {
        async {
            if let Some(cases) = self.full_test_cases(id).await? {
                info!(count = cases.len(), "Retrieved full test cases");
                return Ok(cases);
            }

            debug!("Full test cases unavailable, using examples");
            let cases = self.example_test_cases(id).await?;
            info!(count = cases.len(), "Retrieved example test cases");
            Ok(cases)
        }
        .instrument(info_span!("get_test_cases", problem_id = id))
        .await
    }

    /// `Ok(None)` when the listing is empty or incomplete.
    async fn full_test_cases(&self, id: u32) -> Result<Option<Vec<TestCase>>, Error> {
        let body = self
            .fetch_text(&self.listing_url(id))
            .await
            .map_err(|source| Error::Fetch {
                operation: Operation::FullTestCases,
                id,
                source,
            })?;

        let listing = test_cases::parse_listing(&body, &self.base_url);
        if listing.is_empty() {
            debug!("Test listing has no rows");
            return Ok(None);
        }

        let Listing { mut rows, pending } = listing;
        debug!(
            rows = rows.len(),
            downloads = pending.len(),
            "Parsed test listing"
        );

        // Completion order; the first failure drops every download still in flight
        let downloads: Vec<(PendingChunk, Vec<u8>)> = stream::iter(pending)
            .map(|chunk| self.download_chunk(id, chunk))
            .buffer_unordered(self.max_concurrent_downloads)
            .try_collect()
            .await?;

        for (chunk, content) in downloads {
            rows[chunk.row].fill(chunk.role, content);
        }

        let cases = test_cases::assemble(rows);
        if cases.is_none() {
            debug!("Test listing has incomplete rows");
        }
        Ok(cases)
    }

    async fn download_chunk(
        &self,
        id: u32,
        chunk: PendingChunk,
    ) -> Result<(PendingChunk, Vec<u8>), Error> {
        trace!(chunk = %chunk, "Downloading test chunk");
        match self
            .transport
            .get(&chunk.url)
            .await
            .and_then(|resp| resp.error_for_status())
        {
            Ok(resp) => Ok((chunk, resp.body)),
            Err(source) => Err(Error::Chunk {
                id,
                chunk: chunk.to_string(),
                source,
            }),
        }
    }

    async fn example_test_cases(&self, id: u32) -> Result<Vec<TestCase>, Error> {
        let operation = Operation::ExampleTestCases;
        let body = self
            .fetch_text(&self.problem_url(id))
            .await
            .map_err(|source| Error::Fetch {
                operation,
                id,
                source,
            })?;

        test_cases::parse_examples(&body).map_err(|reason| Error::Structure {
            operation,
            id,
            reason,
        })
    }
}

/// `root` with `segments` appended to its path.
fn endpoint(root: &Url, segments: &[&str]) -> Url {
    let mut url = root.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
