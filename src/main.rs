use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use apbcp::destination::MssqlDestination;
use apbcp::extract::TracingObserver;
use apbcp::loader::{load_spreadsheet, Cli, FormatFile};
use apbcp::LoadResult;

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = e.print();
            return code;
        }
    };

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "apbcp failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> LoadResult<u64> {
    let request = cli.resolve()?;
    let format = match &request.format_file {
        Some(path) => Some(FormatFile::from_path(path)?),
        None => None,
    };

    load_spreadsheet(
        &request.file,
        &request.table,
        &request.options,
        format.as_ref(),
        || MssqlDestination::connect(&request.connection),
        &TracingObserver,
    )
}
