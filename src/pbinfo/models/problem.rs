use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ProblemDifficulty;
use crate::pbinfo::errors::DecodeError;
use crate::pbinfo::json::decode_json;
use crate::pbinfo::normalize::human_size;

/// Marker written for an input/output cell that could not be resolved.
const UNRESOLVED_MARKER: &str = "-";

/// Where a solution reads its input from or writes its output to.
///
/// Serialized as a plain string: `""` for the standard stream, the file name,
/// or `"-"` when the page did not say clearly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IoStream {
    /// Standard input or standard output.
    #[default]
    Standard,
    /// A named file in the working directory.
    File(String),
    /// The cell was present but did not match the expected `in / out` shape,
    /// or named the keyboard/screen, so standard streams are likely but not certain.
    Unresolved,
}

impl IoStream {
    /// Build from a file name; an empty name means the standard stream.
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::Standard
        } else {
            Self::File(name)
        }
    }

    /// File name, if the stream is a named file.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::File(name) => Some(name),
            _ => None,
        }
    }
}

impl From<String> for IoStream {
    fn from(value: String) -> Self {
        if value == UNRESOLVED_MARKER {
            Self::Unresolved
        } else {
            Self::file(value)
        }
    }
}

impl From<IoStream> for String {
    fn from(value: IoStream) -> Self {
        match value {
            IoStream::Standard => String::new(),
            IoStream::File(name) => name,
            IoStream::Unresolved => UNRESOLVED_MARKER.to_string(),
        }
    }
}

/// Metadata of a single pbinfo problem.
///
/// Every field other than `id` starts at its zero value and is only filled
/// from a well-formed cell of the problem's restrictions table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub name: String,
    /// Account that posted the problem.
    pub publisher: String,
    /// Target school grade, `0` when unknown.
    pub grade: u32,
    pub input: IoStream,
    pub output: IoStream,
    /// Execution time limit, zero when unlimited.
    #[serde(with = "duration_nanos")]
    pub max_time: Duration,
    /// Total (heap and stack) memory limit in bytes, zero when unlimited.
    pub max_memory_bytes: u64,
    /// Stack memory limit in bytes, zero when unlimited.
    pub max_stack_bytes: u64,
    /// Where the problem was taken from, empty when unknown.
    pub source: String,
    /// Problem authors. Empty means the publisher is the author.
    pub authors: Vec<String>,
    pub difficulty: ProblemDifficulty,
    /// Score of the caller's latest submission; `None` when nothing was submitted.
    pub score: Option<i64>,
}

impl Problem {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Memory limit formatted for people, e.g. `64MB`.
    pub fn readable_max_memory(&self) -> String {
        human_size(self.max_memory_bytes)
    }

    /// Stack limit formatted for people, e.g. `8MB`.
    pub fn readable_max_stack(&self) -> String {
        human_size(self.max_stack_bytes)
    }

    pub fn input_from_stdin(&self) -> bool {
        self.input == IoStream::Standard
    }

    pub fn output_to_stdout(&self) -> bool {
        self.output == IoStream::Standard
    }

    /// Decode a record previously produced by serializing a [`Problem`] to JSON.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        decode_json(body)
    }
}

/// `Duration` as integer nanoseconds.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Problem {
        Problem {
            id: 3860,
            name: "consecutive1".to_string(),
            publisher: "Pracsiu Dan (dnprx)".to_string(),
            grade: 9,
            input: IoStream::file("consecutive1.in"),
            output: IoStream::Unresolved,
            max_time: Duration::from_millis(100),
            max_memory_bytes: 256_000_000,
            max_stack_bytes: 8_000_000,
            source: "EJOI 2021, sesiunea de antrenament".to_string(),
            authors: vec!["Dan Pracsiu".to_string(), "Ana Pop".to_string()],
            difficulty: ProblemDifficulty::Contest,
            score: Some(0),
        }
    }

    #[test]
    fn test_new_sets_only_id() {
        let problem = Problem::new(42);
        assert_eq!(problem.id, 42);
        assert_eq!(problem, Problem { id: 42, ..Problem::default() });
        assert!(problem.input_from_stdin());
        assert!(problem.output_to_stdout());
        assert_eq!(problem.score, None);
    }

    #[test]
    fn test_json_round_trip() {
        let problem = sample();
        let json = serde_json::to_string(&problem).unwrap();
        assert_eq!(Problem::from_json(&json).unwrap(), problem);
    }

    #[test]
    fn test_json_score_zero_vs_absent() {
        let with_zero = sample();
        let without = Problem {
            score: None,
            ..sample()
        };

        let zero_json = serde_json::to_string(&with_zero).unwrap();
        let none_json = serde_json::to_string(&without).unwrap();
        assert_ne!(zero_json, none_json);

        assert_eq!(Problem::from_json(&zero_json).unwrap().score, Some(0));
        assert_eq!(Problem::from_json(&none_json).unwrap().score, None);
    }

    #[test]
    fn test_json_field_encoding() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["input"], "consecutive1.in");
        assert_eq!(value["output"], "-");
        assert_eq!(value["max_time"], 100_000_000);
        assert_eq!(value["difficulty"], "contest");
        assert_eq!(value["score"], 0);

        let value = serde_json::to_value(Problem::new(1)).unwrap();
        assert_eq!(value["input"], "");
        assert!(value["score"].is_null());
    }

    #[test]
    fn test_io_stream_states_are_distinct() {
        assert_eq!(IoStream::from(String::new()), IoStream::Standard);
        assert_eq!(IoStream::from("-".to_string()), IoStream::Unresolved);
        assert_eq!(
            IoStream::from("a.in".to_string()),
            IoStream::File("a.in".to_string())
        );
        assert_eq!(IoStream::file("a.in").file_name(), Some("a.in"));
        assert_eq!(IoStream::Unresolved.file_name(), None);
    }

    #[test]
    fn test_from_json_reports_path() {
        let err = Problem::from_json(r#"{"id": "abc"}"#).unwrap_err();
        assert_eq!(err.path, "id");
    }

    #[test]
    fn test_readable_limits() {
        let problem = sample();
        assert_eq!(problem.readable_max_memory(), "256MB");
        assert_eq!(problem.readable_max_stack(), "8MB");
    }
}
