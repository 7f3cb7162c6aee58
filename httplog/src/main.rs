mod config;
mod errors;

use std::process::ExitCode;

use clap::Parser;
use server::{LogDirAllocator, get_app, serve};
use smol::net::TcpListener;
use tracing::info;

use crate::{config::Cli, errors::StartupError};

fn main() -> ExitCode {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match smol::block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("httplog: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    shared::init_logging(&cli.log_level, cli.log_json)?;
    let listener = prepare(&cli).await?;

    info!(
        port = cli.port,
        log_dir = %cli.log_dir.display(),
        "Starting HTTP log server, press Ctrl+C to stop"
    );

    serve(listener, get_app(LogDirAllocator::new(&cli.log_dir))).await;

    Ok(())
}

/// Creates the log root and binds the listener.
async fn prepare(cli: &Cli) -> Result<TcpListener, StartupError> {
    LogDirAllocator::new(&cli.log_dir)
        .ensure_root()
        .map_err(|source| StartupError::CreateLogDir {
            path: cli.log_dir.clone(),
            source,
        })?;

    let addr = cli.socket_addr();
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}
