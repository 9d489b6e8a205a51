//! Scraping client for pbinfo.ro problem pages and test listings.

pub mod api;
pub(crate) mod columns;
pub mod errors;
pub mod json;
pub mod models;
pub mod normalize;
pub(crate) mod problem_page;
pub(crate) mod test_cases;
pub mod transport;

pub use api::PbInfoClient;
pub use errors::{DecodeError, Error, FetchError, Operation, StructureError};
pub use models::{IoStream, Problem, ProblemDifficulty, TestCase};
pub use transport::{HttpTransport, Response, Transport};
