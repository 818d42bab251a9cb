use ghtar_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Logging goes to the XDG state dir; fall back to stderr if that is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli::run_from_args().await {
        eprintln!("ghtar: {}", cli::describe_error(&err));
        std::process::exit(1);
    }
}
