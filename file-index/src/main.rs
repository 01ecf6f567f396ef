//! File Index
//!
//! Ingests the files named on the command line: each one is stored on disk,
//! recorded in the document store and projected into the search index.
//!
//! Usage: `file-index <path>...`

use std::path::Path;
use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use file_index::{AppConfig, Dependencies};
use file_index_pipeline::Artifact;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Display name of a local file: its final path component.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: file-index <path>...");
        return ExitCode::from(2);
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, no further files will be started");
            on_signal.cancel();
        }
    });

    let artifacts = paths
        .iter()
        .map(|path| {
            let path = Path::new(path);
            Artifact::open(display_name(path), path)
        })
        .collect();

    info!(file_count = paths.len(), "Starting ingestion");
    let report = deps.orchestrator.ingest_until(artifacts, cancel).await;

    for record in &report.succeeded {
        println!("saved {} as {} at {}", record.name, record.id, record.path);
    }
    for err in &report.failed {
        println!("{}", err);
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/home/me/My Report.pdf")), "My Report.pdf");
        assert_eq!(display_name(Path::new("notes.txt")), "notes.txt");
    }
}
