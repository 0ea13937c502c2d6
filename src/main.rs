use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    wikinav::logging::init().context("init logging")?;

    let cli = wikinav::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        wikinav::cli::Command::Augment(args) => {
            wikinav::augment::run(args).context("augment")?;
        }
        wikinav::cli::Command::Toggle(args) => {
            wikinav::tree_state::toggle(args).context("toggle")?;
        }
        wikinav::cli::Command::State {
            command: wikinav::cli::StateCommand::Show(args),
        } => {
            wikinav::store::show(args).context("state show")?;
        }
    }

    Ok(())
}
