use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use bmoisil::config::Config;
use bmoisil::pbinfo::PbInfoClient;
use clap::Parser;
use tracing::{error, info};

use crate::cli::Args;
use crate::logging::setup_logging;

mod cli;
mod logging;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logging depends on the configured level, so config errors go straight to stderr
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        problem_id = args.id,
        "starting bmoisil"
    );

    let client = PbInfoClient::new(&config);

    tokio::select! {
        result = run(&client, &args) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(problem_id = args.id, "{e:#}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, exiting");
            ExitCode::SUCCESS
        }
    }
}

async fn run(client: &PbInfoClient, args: &Args) -> anyhow::Result<()> {
    let test_cases = async {
        if args.show_test_cases {
            client.get_test_cases(args.id).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (problem, test_cases) = tokio::try_join!(client.find_problem_by_id(args.id), test_cases)?;

    let mut stdout = io::stdout().lock();
    output::write_problem(&mut stdout, &problem).context("Failed to write problem")?;
    if let Some(cases) = test_cases {
        output::write_test_cases(&mut stdout, &cases, args.size_limit)
            .context("Failed to write test cases")?;
    }
    stdout.flush()?;
    Ok(())
}
