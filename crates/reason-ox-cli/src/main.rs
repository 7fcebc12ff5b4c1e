use std::io::Write;

use anyhow::Context;
use clap::Parser;
use reason_ox::{Pipeline, ReasoningClient, Stage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// Ask a question, get an improved prompt, a reasoning trace and an answer.
///
/// Settings come from `LLM_*` environment variables or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "reason-ox", version, about)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _args = Args::parse();
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let client = ReasoningClient::from_env().context("failed to load configuration")?;

    let question = read_question().await?;

    let result = Pipeline::new(&client)
        .run_with(&question, |stage| match stage {
            Stage::Improved(text) => println!("\nImproved User Question:\n{text}"),
            Stage::Reasoned(text) => println!("\nReasoning Tokens:\n{text}"),
            Stage::Answered(text) => println!("\nAnswer:\n{text}"),
        })
        .await;

    if let Err(err) = result {
        tracing::error!("request failed: {err}");
        println!("\nAnswer:\n{FAILURE_MESSAGE}");
    }

    Ok(())
}

async fn read_question() -> anyhow::Result<String> {
    print!("Please enter your question: ");
    std::io::stdout().flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await
        .context("failed to read question from stdin")?;

    Ok(line.unwrap_or_default())
}
