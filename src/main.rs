use anyhow::Result;
use clap::{CommandFactory as _, Parser};
use std::sync::Arc;

use dotfile_linker::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match &args.command {
        cli::Command::Link(opts) => {
            args.global.check_supported()?;
            let log = start_logging(&args);
            commands::link::run(&args.global, opts, args.verbose, log).map(|_| ())
        }
        cli::Command::Adopt(opts) => {
            args.global.check_supported()?;
            let log = start_logging(&args);
            commands::adopt::run(&args.global, opts, args.verbose, log).map(|_| ())
        }
        cli::Command::Completions { shell } => {
            let mut command = cli::Cli::command();
            clap_complete::generate(*shell, &mut command, "linker", &mut std::io::stdout());
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}

/// Install the tracing subscriber and return the logger for this command.
fn start_logging(args: &cli::Cli) -> Arc<dyn logging::Log> {
    let command = args.command.name();
    logging::init_subscriber(args.verbose || args.global.dry_run, command);
    let log = logging::Logger::new(command);
    if let Some(path) = log.log_path() {
        log.debug(&format!("log file: {}", path.display()));
    }
    Arc::new(log)
}
