use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = edge_switch::cli::Cli::parse();
    if let Err(e) = edge_switch::cmd::dispatch(cli).await {
        tracing::error!(error = %e, "edge-switch failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
