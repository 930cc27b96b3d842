//! Rendering of linker events for the console and the per-command log file.
//!
//! Every event is classified once into a [`Line`]. Narration of link
//! decisions (`linking ... to ...`, `... already exists... moving to ...`)
//! gets a sigil per action, and per-target failures are set apart from
//! other warnings. The console adds colour; the log file gets the same
//! classification as a plain tag.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{clock, log_file_path, run_started};

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "linker::stage";
/// Tracing target for dry-run narration.
pub(super) const DRY_RUN_TARGET: &str = "linker::dry_run";

/// A filesystem action the engine narrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    CreateDir,
    Delete,
    Backup,
    Link,
    Move,
}

impl Action {
    /// Recognise a narration line by its fixed wording.
    fn parse(msg: &str) -> Option<Self> {
        if msg.ends_with("doesn't exist... creating it") {
            Some(Self::CreateDir)
        } else if msg.ends_with("already exists... deleting") {
            Some(Self::Delete)
        } else if msg.contains("already exists... moving to ") {
            Some(Self::Backup)
        } else if msg.starts_with("linking ") && msg.contains(" to ") {
            Some(Self::Link)
        } else if msg.starts_with("moving ") {
            Some(Self::Move)
        } else {
            None
        }
    }

    const fn sigil(self) -> char {
        match self {
            Self::CreateDir | Self::Link => '+',
            Self::Delete => '-',
            Self::Backup => '~',
            Self::Move => '>',
        }
    }

    const fn colour(self) -> &'static str {
        match self {
            Self::CreateDir | Self::Link => "\x1b[32m",
            Self::Delete => "\x1b[31m",
            Self::Backup => "\x1b[33m",
            Self::Move => "\x1b[36m",
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::CreateDir => "mkdir",
            Self::Delete => "delete",
            Self::Backup => "backup",
            Self::Link => "link",
            Self::Move => "move",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Action(Action),
    /// `linking <link> failed: <reason>`
    Failure,
    Warn,
    Error,
    Info,
    Debug,
}

/// One classified event.
#[derive(Debug)]
struct Line<'a> {
    kind: Kind,
    dry_run: bool,
    msg: &'a str,
}

impl<'a> Line<'a> {
    fn classify(level: Level, target: &str, msg: &'a str) -> Self {
        let kind = match level {
            Level::ERROR => Kind::Error,
            Level::WARN if msg.starts_with("linking ") && msg.contains(" failed: ") => {
                Kind::Failure
            }
            Level::WARN => Kind::Warn,
            _ if target == STAGE_TARGET => Kind::Stage,
            Level::DEBUG | Level::TRACE => Action::parse(msg).map_or(Kind::Debug, Kind::Action),
            _ => Action::parse(msg).map_or(Kind::Info, Kind::Action),
        };
        Self {
            kind,
            dry_run: target == DRY_RUN_TARGET,
            msg,
        }
    }

    fn console(&self) -> String {
        let msg = self.msg;
        let dry = if self.dry_run {
            "\x1b[33m[dry run]\x1b[0m "
        } else {
            ""
        };
        match self.kind {
            Kind::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::Action(action) => {
                format!("  {dry}{}{}\x1b[0m {msg}", action.colour(), action.sigil())
            }
            Kind::Failure => format!("  \x1b[1;31m!\x1b[0m {msg}"),
            Kind::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Kind::Info => format!("  {dry}{msg}"),
            Kind::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    fn plain(&self, clock: &str) -> String {
        let tag = match self.kind {
            Kind::Stage => "stage",
            Kind::Action(action) => action.tag(),
            Kind::Failure => "failed",
            Kind::Warn => "warn",
            Kind::Error => "error",
            Kind::Info => "info",
            Kind::Debug => "debug",
        };
        let dry = if self.dry_run { "(dry run) " } else { "" };
        format!("{clock} {tag:<6} {dry}{}", self.msg)
    }
}

/// The `message` field of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut message = Message::default();
    event.record(&mut message);
    message.0
}

/// Appends every event to the command's log file, one tagged line each.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` under the user's cache directory.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::open(&log_file_path(command)?, command)
    }

    #[cfg(test)]
    pub(super) fn in_dir(cache_root: &Path, command: &str) -> Option<Self> {
        Self::open(&super::utils::log_file_in(cache_root, command)?, command)
    }

    /// Truncate `path` to a one-line run header and keep it open.
    fn open(path: &Path, command: &str) -> Option<Self> {
        let version = crate::commands::version::version();
        let header = format!("# linker {version} {command} {}\n", run_started());
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let msg = message_of(event);
        let line = Line::classify(*metadata.level(), metadata.target(), &msg).plain(&clock());
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console rendering of [`Line`]s.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = message_of(event);
        writeln!(
            writer,
            "{}",
            Line::classify(*metadata.level(), metadata.target(), &msg).console()
        )
    }
}

/// Install the global subscriber for `command`.
///
/// The console shows `DEBUG` and up when `verbose`, `INFO` and up otherwise;
/// warnings and errors go to stderr. The log file always gets `DEBUG` and up.
/// Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormat)
                .with_writer(writer)
                .with_filter(console_level),
        )
        .with(FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn narration_is_classified_by_action() {
        let cases = [
            ("directory /h/.config doesn't exist... creating it", Action::CreateDir),
            ("/h/.bashrc already exists... deleting", Action::Delete),
            ("/h/.bashrc already exists... moving to /h/.bashrc.back", Action::Backup),
            ("linking /s/common/.bashrc to /h/.bashrc", Action::Link),
            ("moving /h/app.conf to /s/laptop/_h_app.conf", Action::Move),
        ];
        for (msg, action) in cases {
            assert_eq!(Action::parse(msg), Some(action), "{msg}");
        }
        assert_eq!(Action::parse("3 linked, 0 already ok"), None);
    }

    #[test]
    fn link_failures_are_set_apart_from_other_warnings() {
        let failure = Line::classify(Level::WARN, "linker", "linking /etc/hosts failed: denied");
        assert_eq!(failure.kind, Kind::Failure);
        let banner = Line::classify(Level::WARN, "linker", "THIS IS A DRY RUN");
        assert_eq!(banner.kind, Kind::Warn);
    }

    #[test]
    fn dry_run_narration_keeps_its_action() {
        let line = Line::classify(Level::INFO, DRY_RUN_TARGET, "linking /s/a to /h/a");
        assert_eq!(line.kind, Kind::Action(Action::Link));
        assert!(line.dry_run);
        assert_eq!(line.plain("12:00:00"), "12:00:00 link   (dry run) linking /s/a to /h/a");
        assert_eq!(
            line.console(),
            "  \x1b[33m[dry run]\x1b[0m \x1b[32m+\x1b[0m linking /s/a to /h/a"
        );
    }

    #[test]
    fn verbose_narration_is_debug_level() {
        let line = Line::classify(Level::DEBUG, "linker", "/h/a already exists... deleting");
        assert_eq!(line.kind, Kind::Action(Action::Delete));
        assert_eq!(line.plain("t"), "t delete /h/a already exists... deleting");
    }

    #[test]
    fn stage_and_plain_messages() {
        let stage = Line::classify(Level::INFO, STAGE_TARGET, "Linking into /h");
        assert_eq!(stage.plain("t"), "t stage  Linking into /h");
        let info = Line::classify(Level::INFO, "linker", "2 linked, 1 already ok");
        assert_eq!(info.kind, Kind::Info);
        assert_eq!(info.console(), "  2 linked, 1 already ok");
        let debug = Line::classify(Level::DEBUG, "linker", "found 3 files");
        assert_eq!(debug.kind, Kind::Debug);
    }

    #[test]
    fn file_layer_writes_header() {
        let tmp = tempfile::tempdir().unwrap();
        let layer = FileLayer::in_dir(tmp.path(), "link");
        assert!(layer.is_some());
        let contents = fs::read_to_string(tmp.path().join("linker").join("link.log")).unwrap();
        assert!(contents.starts_with("# linker "), "{contents}");
        assert!(contents.contains(" link "));
    }
}
