use clap::Parser;
use gmail_sender::cli::Cli;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(err) = gmail_sender::run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
