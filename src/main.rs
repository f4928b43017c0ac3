use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = passforge::cli::Cli::parse();
    cli.run()
}
