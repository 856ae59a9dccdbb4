//! EHR Portal CLI
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=ehr_portal=debug ehr open /records`).

use clap::Parser;
use ehr_portal::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let output = run(cli).await?;
    println!("{}", output.trim_end());

    Ok(())
}
