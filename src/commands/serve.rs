use api::AppState;
use colored::Colorize;
use tracing::info;

use crate::cli::ServeArgs;
use crate::commands::{CmdResult, open_contextor};

pub async fn run(args: ServeArgs) -> CmdResult {
    // No index means nothing to serve: fail before binding.
    let contextor = open_contextor(&args.index, args.top_k).await?;
    let state = AppState::new(contextor);
    info!(
        temperature = state.temperature,
        address = %args.address,
        "starting HTTP server"
    );

    println!(
        "{}",
        format!("Starting server on http://{}", args.address).green()
    );
    api::start(&args.address, state).await?;
    Ok(())
}
