// src/main.rs

use apprelay::{cli, logging, run};
use tracing::info;

#[tokio::main]
async fn main() {
    // Once the relay is complete there is nothing left to do: stop hard
    // instead of waiting on helper tasks (e.g. a pending stdin read).
    match run_main().await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("apprelay error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    if let Some(outcome) = run(args).await? {
        info!(cause = ?outcome.cause, followup_launched = outcome.followup_launched, "relay finished");
    }
    Ok(())
}
