//! The linking engine: discovery, reconciliation, and adoption.
//!
//! A run folds one [`LinkOutcome`] or [`LinkFailure`] per target into
//! [`LinkStats`]. Per-target failures never stop the pass; they are raised
//! together as [`LinkerError::LinksFailed`] once every target was tried.
//! Failing to create an ancestor directory aborts the run immediately.
mod context;

pub use context::Context;

use std::io;
use std::path::{Path, PathBuf};

use crate::config::absolute_path;
use crate::discovery::{Bucket, find_targets};
use crate::error::{LinkFailure, LinkFailures, LinkerError};
use crate::naming::storage_name_for;
use crate::resources::fs::ensure_parent_dirs;
use crate::resources::{LinkOutcome, LinkResource, Planned, ResourceState, reconcile};

/// Counters for one linking run.
///
/// # Examples
///
/// ```
/// use dotfile_linker::engine::LinkStats;
///
/// let stats = LinkStats { linked: 2, already_ok: 5, ..LinkStats::default() };
/// assert_eq!(stats.summary(false), "2 linked, 5 already ok");
/// assert_eq!(stats.summary(true), "2 would link, 5 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Links created, including those that replaced an existing entry.
    pub linked: u32,
    /// Links that already resolved to their source.
    pub already_ok: u32,
    /// Existing entries moved to `<link>.back`.
    pub backed_up: u32,
    /// Existing entries deleted.
    pub deleted: u32,
    /// Targets that could not be linked.
    pub failed: u32,
}

impl LinkStats {
    /// Format the summary line, listing optional counters only when non-zero.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would link" } else { "linked" };
        let mut summary = format!("{} {verb}, {} already ok", self.linked, self.already_ok);
        for (count, label) in [
            (self.backed_up, "backed up"),
            (self.deleted, "deleted"),
            (self.failed, "failed"),
        ] {
            if count > 0 {
                summary.push_str(&format!(", {count} {label}"));
            }
        }
        summary
    }

    fn record(&mut self, outcome: &LinkOutcome) {
        if outcome.created_link() {
            self.linked += 1;
        }
        match outcome {
            LinkOutcome::AlreadyCorrect => self.already_ok += 1,
            LinkOutcome::BackedUp { .. } => self.backed_up += 1,
            LinkOutcome::Replaced => self.deleted += 1,
            LinkOutcome::Linked => {}
        }
    }
}

/// Accumulates outcomes and failures across one pass.
#[derive(Default)]
struct Pass {
    stats: LinkStats,
    failures: Vec<LinkFailure>,
}

impl Pass {
    fn record(&mut self, ctx: &Context, result: Result<LinkOutcome, LinkFailure>) {
        match result {
            Ok(outcome) => self.stats.record(&outcome),
            Err(failure) => {
                ctx.log.warn(&format!("{failure}: {}", failure.source));
                self.stats.failed += 1;
                self.failures.push(failure);
            }
        }
    }

    fn finish(self, ctx: &Context) -> Result<LinkStats, LinkerError> {
        ctx.log.info(&self.stats.summary(ctx.dry_run()));
        if self.failures.is_empty() {
            Ok(self.stats)
        } else {
            Err(LinkerError::LinksFailed(LinkFailures(self.failures)))
        }
    }
}

/// Link every file in the common and host buckets into `destination_root`.
///
/// # Errors
///
/// Returns a fatal error if discovery or directory creation fails, and
/// [`LinkerError::LinksFailed`] after the pass if any target failed.
pub fn make_links(ctx: &Context, destination_root: &Path) -> Result<LinkStats, LinkerError> {
    let destination_root = absolute_path(destination_root)?;
    let sources = find_targets(
        ctx.fs_ops.as_ref(),
        ctx.source_root(),
        ctx.host(),
        ctx.options().exclude_common,
    )?;
    ctx.log.debug(&format!(
        "found {} files for host {} in {}",
        sources.len(),
        ctx.host(),
        ctx.source_root().display()
    ));
    link_sources(ctx, &sources, &destination_root)
}

/// Link an explicit list of stored files into `destination_root`, in order.
///
/// When two sources map to the same link, the later one wins. An earlier
/// source is skipped once the link already resolves to the later one, so a
/// repeated run neither backs up nor fails. A dry run tracks what earlier
/// targets would have created, so it reports the same outcomes as the real
/// run. Sources whose name is not valid UTF-8 are skipped with a warning.
///
/// # Errors
///
/// Same as [`make_links`].
pub fn link_sources(
    ctx: &Context,
    sources: &[PathBuf],
    destination_root: &Path,
) -> Result<LinkStats, LinkerError> {
    let plan: Vec<LinkResource> = sources
        .iter()
        .filter_map(|source| {
            let resource = LinkResource::for_source(source, destination_root);
            if resource.is_none() {
                ctx.log.warn(&format!(
                    "skipping {}: file name is not valid UTF-8",
                    source.display()
                ));
            }
            resource
        })
        .collect();

    let mut pass = Pass::default();
    let mut planned = Planned::default();
    let mut rest = plan.as_slice();
    while let Some((resource, later)) = rest.split_first() {
        rest = later;
        if let Some(winner) = superseded_by(ctx, resource, later) {
            ctx.log.debug(&format!(
                "{} is provided by {}",
                resource.link.display(),
                winner.source.display()
            ));
            pass.record(ctx, Ok(LinkOutcome::AlreadyCorrect));
            continue;
        }
        ensure_parent_dirs(ctx, &resource.link, &mut planned)?;
        pass.record(ctx, reconcile(ctx, resource, &mut planned));
    }
    pass.finish(ctx)
}

/// The later resource for the same link, if the link already resolves to it.
fn superseded_by<'a>(
    ctx: &Context,
    resource: &LinkResource,
    later: &'a [LinkResource],
) -> Option<&'a LinkResource> {
    later
        .iter()
        .rev()
        .find(|other| other.link == resource.link)
        .filter(|other| other.current_state(ctx.fs_ops.as_ref()) == ResourceState::Correct)
}

/// Move a live file into the source tree and link it back into place.
///
/// The file goes to the host bucket, or the common bucket when `to_common`
/// is set, under the name [`storage_name_for`] gives it. The original path
/// then becomes a symlink to the stored copy.
///
/// # Errors
///
/// Returns [`LinkerError::Adopt`] if the live file is missing, is already
/// tracked, would overwrite a stored file, or cannot be moved. Linking
/// failures after the move surface as [`LinkerError::LinksFailed`].
pub fn adopt_and_link(
    ctx: &Context,
    live_file: &Path,
    to_common: bool,
) -> Result<LinkStats, LinkerError> {
    let fs = ctx.fs_ops.as_ref();
    let live = std::path::absolute(live_file).map_err(|source| LinkerError::Adopt {
        from: live_file.to_path_buf(),
        to: PathBuf::new(),
        source,
    })?;

    let bucket = if to_common {
        Bucket::Common
    } else {
        Bucket::for_host(ctx.host())
    };
    let bucket_dir = bucket.path(ctx.source_root());
    let stored = bucket_dir.join(storage_name_for(&live, ctx.source_root()));
    let refuse = |kind: io::ErrorKind, msg: String| LinkerError::Adopt {
        from: live.clone(),
        to: stored.clone(),
        source: io::Error::new(kind, msg),
    };

    if !fs.entry_exists(&live) {
        return Err(refuse(
            io::ErrorKind::NotFound,
            format!("{} does not exist", live.display()),
        ));
    }
    if let (Ok(resolved), Ok(root)) = (fs.canonicalize(&live), fs.canonicalize(ctx.source_root()))
        && resolved.starts_with(&root)
    {
        return Err(refuse(
            io::ErrorKind::InvalidInput,
            format!("{} is already tracked", live.display()),
        ));
    }
    if fs.entry_exists(&stored) {
        return Err(refuse(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", stored.display()),
        ));
    }

    ctx.narrate(&format!("moving {} to {}", live.display(), stored.display()));
    let resource = LinkResource::new(stored.clone(), live.clone());
    let mut pass = Pass::default();

    if ctx.dry_run() {
        ctx.narrate(&format!(
            "linking {} to {}",
            resource.source.display(),
            resource.link.display()
        ));
        pass.record(ctx, Ok(LinkOutcome::Linked));
        return pass.finish(ctx);
    }

    fs.create_dir_all(&bucket_dir)
        .map_err(|source| LinkerError::CreateDir {
            path: bucket_dir.clone(),
            source,
        })?;
    fs.move_file(&live, &stored)
        .map_err(|source| LinkerError::Adopt {
            from: live.clone(),
            to: stored.clone(),
            source,
        })?;

    pass.record(ctx, reconcile(ctx, &resource, &mut Planned::default()));
    pass.finish(ctx)
}
