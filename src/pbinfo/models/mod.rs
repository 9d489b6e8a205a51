//! Value records returned by the client.

pub mod difficulty;
pub mod problem;
pub mod test_case;

pub use difficulty::ProblemDifficulty;
pub use problem::{IoStream, Problem};
pub use test_case::TestCase;
