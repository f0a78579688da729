use clap::Parser;
use vdskit::cli::{run, Cli};
use vdskit::init_logging_with;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with(cli.verbose)?;

    run(&cli)?;
    Ok(())
}
