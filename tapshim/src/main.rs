mod cli;
mod config;
mod domain;
mod hookserver;
mod namescheme;
mod rewrite;
mod vmi;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    cli::main().await
}
