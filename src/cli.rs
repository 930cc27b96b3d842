use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::config::LinkOptions;
use crate::error::LinkerError;

/// Top-level CLI entry point for the dotfile linker.
#[derive(Parser, Debug)]
#[command(
    name = "linker",
    about = "Symlink files from a tracked source tree into place",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print every change
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Source tree holding the `common/` and `<hostname>/` buckets
    /// (default: $LINKER_SOURCE, then the current directory)
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// Bucket to link instead of this machine's host name
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// Only link the host bucket, skipping `common`
    #[arg(short = 'x', long, global = true)]
    pub exclude_common: bool,

    /// Delete existing files instead of moving them to `<name>.back`
    #[arg(long, global = true)]
    pub delete_existing: bool,

    /// Print all changes, but don't make them
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Prompt for every change
    #[arg(short, long, global = true)]
    pub interactive: bool,
}

impl GlobalOpts {
    /// Reject options that parse but are not supported.
    ///
    /// # Errors
    ///
    /// Returns [`LinkerError::InteractiveNotImplemented`] for `--interactive`.
    pub const fn check_supported(&self) -> Result<(), LinkerError> {
        if self.interactive {
            return Err(LinkerError::InteractiveNotImplemented);
        }
        Ok(())
    }

    /// Behaviour switches selected on the command line.
    #[must_use]
    pub const fn link_options(&self, verbose: bool) -> LinkOptions {
        LinkOptions {
            exclude_common: self.exclude_common,
            delete_existing: self.delete_existing,
            dry_run: self.dry_run,
            verbose,
            interactive: self.interactive,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link every tracked file for this host into a destination directory
    Link(LinkOpts),
    /// Move a file into the source tree, then link it back to where it was
    Adopt(AdoptOpts),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Link(_) => "link",
            Self::Adopt(_) => "adopt",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Directory the links are created in (usually your home directory)
    pub destination: PathBuf,
}

/// Options for the `adopt` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AdoptOpts {
    /// Store the file in `common` instead of the host bucket
    #[arg(short, long)]
    pub common: bool,

    /// File currently in use that should become tracked
    pub file: PathBuf,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_link() {
        let cli = Cli::parse_from(["linker", "link", "/home/me"]);
        assert!(
            matches!(&cli.command, Command::Link(opts) if opts.destination == PathBuf::from("/home/me"))
        );
        assert_eq!(cli.command.name(), "link");
    }

    #[test]
    fn parse_link_requires_destination() {
        assert!(Cli::try_parse_from(["linker", "link"]).is_err());
    }

    #[test]
    fn parse_global_flags_short() {
        let cli = Cli::parse_from(["linker", "-s", "/dots", "-x", "-d", "-v", "link", "/home/me"]);
        assert_eq!(cli.global.source, Some(PathBuf::from("/dots")));
        assert!(cli.global.exclude_common);
        assert!(cli.global.dry_run);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "linker",
            "link",
            "/home/me",
            "--delete-existing",
            "--hostname",
            "desktop",
            "-i",
        ]);
        assert!(cli.global.delete_existing);
        assert!(cli.global.interactive);
        assert_eq!(cli.global.hostname.as_deref(), Some("desktop"));
    }

    #[test]
    fn link_options_copy_flags() {
        let cli = Cli::parse_from(["linker", "-d", "--delete-existing", "link", "/x"]);
        let options = cli.global.link_options(cli.verbose);
        assert_eq!(
            options,
            LinkOptions {
                delete_existing: true,
                dry_run: true,
                ..LinkOptions::default()
            }
        );
    }

    #[test]
    fn interactive_is_unsupported() {
        let cli = Cli::parse_from(["linker", "-i", "link", "/x"]);
        assert!(matches!(
            cli.global.check_supported(),
            Err(LinkerError::InteractiveNotImplemented)
        ));
        let cli = Cli::parse_from(["linker", "link", "/x"]);
        assert!(cli.global.check_supported().is_ok());
    }

    #[test]
    fn parse_adopt() {
        let cli = Cli::parse_from(["linker", "adopt", "--common", "/etc/hosts"]);
        assert!(
            matches!(&cli.command, Command::Adopt(_)),
            "Expected Adopt command"
        );
        if let Command::Adopt(opts) = cli.command {
            assert!(opts.common);
            assert_eq!(opts.file, PathBuf::from("/etc/hosts"));
        }
    }

    #[test]
    fn parse_adopt_defaults_to_host_bucket() {
        let cli = Cli::parse_from(["linker", "adopt", "-c", "/etc/hosts"]);
        assert!(matches!(cli.command, Command::Adopt(ref o) if o.common));
        let cli = Cli::parse_from(["linker", "adopt", "/etc/hosts"]);
        assert!(matches!(cli.command, Command::Adopt(ref o) if !o.common));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["linker", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["linker", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
