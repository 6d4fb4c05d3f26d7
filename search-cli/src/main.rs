use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use search_cli::{output, AppError, Dependencies, Settings};
use search_client::{cancellation, SearchResult};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(settings: &Settings) -> Result<SearchResult, AppError> {
    let request = settings.build_request()?;
    let deps = Dependencies::new(settings)?;

    // Ctrl-C aborts the in-flight request.
    let (handle, signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling search");
            handle.cancel();
        }
    });

    let result = if settings.retry {
        deps.client.query_with_retry(&request, &signal).await?
    } else {
        deps.client.query(&request, &signal).await?
    };

    for node in deps.locator.nodes() {
        if let Some(last_used) = node.last_used() {
            info!(node = %node.search_uri(), last_used = %last_used, "Node liveness");
        }
    }

    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let settings = Settings::parse();
    init_tracing(settings.log_json);

    let result = match run(&settings).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Search failed");
            return ExitCode::FAILURE;
        }
    };

    match output::to_pretty_string(&result) {
        Ok(doc) => println!("{}", doc),
        Err(e) => {
            error!(error = %e, "Failed to render result");
            return ExitCode::FAILURE;
        }
    }

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        warn!(status = ?result.status(), "Search did not succeed");
        ExitCode::FAILURE
    }
}
