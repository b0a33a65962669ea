// secretsctl - Command line client for a secrets-management service
use clap::Parser;
use secretsctl::cli::args::Args;
use secretsctl::cli::commands::execute_command;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
