use clap::Parser;

#[tokio::main]
async fn main() {
    use ridelog::util::cli::*;

    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let opts = Options::parse();
    if let Err(e) = run_cli_action(opts).await {
        tracing::error!("{}", e);
        if let CliError::Client(e) = &e {
            if e.needs_reauthorization() {
                tracing::error!("Authorize the application again to obtain a new refresh token");
            }
        }
        std::process::exit(1);
    }
}
