use chunkmirror_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args().await {
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("chunkmirror error: {:#}", err);
            std::process::exit(cli::EXIT_FATAL);
        }
    }
}
