use clap::{Parser, ValueEnum};

/// Fetch a pbinfo.ro problem and, optionally, its test cases.
#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_SHORT"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// The ID of the pbinfo problem to retrieve
    #[arg(long)]
    pub id: u32,

    /// Also retrieve and print the test cases
    #[arg(long)]
    pub show_test_cases: bool,

    /// Maximum number of bytes of test content to print
    #[arg(long, default_value_t = 1000)]
    pub size_limit: usize,

    /// Log output format, written to stderr
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable output
    Pretty,
    /// One JSON object per event
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
