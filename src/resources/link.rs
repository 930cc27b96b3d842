//! Link resource.
use std::io;
use std::path::{Path, PathBuf};

use super::fs::backup_path;
use super::{LinkOutcome, Planned, ResourceState};
use crate::engine::Context;
use crate::error::LinkFailure;
use crate::naming::link_path_for;
use crate::operations::FileSystemOps;

/// A link that should exist at `link` and resolve to `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResource {
    /// The stored file inside a bucket (what the link points to).
    pub source: PathBuf,
    /// Where the link lives.
    pub link: PathBuf,
}

impl LinkResource {
    /// Create a new link resource.
    #[must_use]
    pub const fn new(source: PathBuf, link: PathBuf) -> Self {
        Self { source, link }
    }

    /// The resource for a stored file, with the link path derived from its
    /// basename.
    ///
    /// Returns `None` when the basename is not valid UTF-8, since the naming
    /// scheme cannot decode it.
    #[must_use]
    pub fn for_source(source: &Path, destination_root: &Path) -> Option<Self> {
        let basename = source.file_name()?.to_str()?;
        Some(Self::new(
            source.to_path_buf(),
            link_path_for(basename, destination_root),
        ))
    }

    /// Check what currently occupies the link path.
    ///
    /// A broken symlink counts as present. The link is correct when it and
    /// the source canonicalize to the same path, so a link path that is the
    /// source file itself is never disturbed.
    #[must_use]
    pub fn current_state(&self, fs: &dyn FileSystemOps) -> ResourceState {
        if !fs.entry_exists(&self.link) {
            return ResourceState::Missing;
        }
        match (fs.canonicalize(&self.link), fs.canonicalize(&self.source)) {
            (Ok(resolved), Ok(source)) if resolved == source => ResourceState::Correct,
            _ => ResourceState::Incorrect,
        }
    }

    /// [`current_state`](Self::current_state), except that during a dry run
    /// a link planned by an earlier target takes precedence over the disk.
    #[must_use]
    pub fn planned_state(&self, ctx: &Context, planned: &Planned) -> ResourceState {
        if ctx.dry_run()
            && let Some(target) = planned.link_target(&self.link)
        {
            return if target == self.source {
                ResourceState::Correct
            } else {
                ResourceState::Incorrect
            };
        }
        self.current_state(ctx.fs_ops.as_ref())
    }
}

/// What was done with the previous occupant of a link path.
enum Displaced {
    Deleted,
    BackedUp(PathBuf),
}

/// Make `resource.link` a symlink to `resource.source`.
///
/// An occupied link path is deleted when `delete_existing` is set and moved
/// to `<link>.back` otherwise. Every decision is narrated; a dry run makes
/// the same decisions without mutating anything, recording them in `planned`
/// so later targets of the same pass see them.
///
/// # Errors
///
/// Returns a [`LinkFailure`] for this link if clearing the path or creating
/// the symlink fails, including when `<link>.back` is already taken. The
/// caller records it and moves on to the next target.
pub fn reconcile(
    ctx: &Context,
    resource: &LinkResource,
    planned: &mut Planned,
) -> Result<LinkOutcome, LinkFailure> {
    let fail = |source| LinkFailure::new(&resource.link, source);

    let displaced = match resource.planned_state(ctx, planned) {
        ResourceState::Correct => return Ok(LinkOutcome::AlreadyCorrect),
        ResourceState::Missing => None,
        ResourceState::Incorrect => Some(clear(ctx, &resource.link, planned).map_err(fail)?),
    };

    ctx.narrate(&format!(
        "linking {} to {}",
        resource.source.display(),
        resource.link.display()
    ));
    if ctx.dry_run() {
        planned.add_link(&resource.link, &resource.source);
    } else {
        ctx.fs_ops
            .symlink(&resource.source, &resource.link)
            .map_err(fail)?;
    }

    Ok(match displaced {
        None => LinkOutcome::Linked,
        Some(Displaced::Deleted) => LinkOutcome::Replaced,
        Some(Displaced::BackedUp(backup)) => LinkOutcome::BackedUp { backup },
    })
}

/// Remove or move aside whatever occupies `link`.
fn clear(ctx: &Context, link: &Path, planned: &mut Planned) -> io::Result<Displaced> {
    if ctx.options().delete_existing {
        ctx.narrate(&format!("{} already exists... deleting", link.display()));
        if !ctx.dry_run() {
            ctx.fs_ops.remove(link)?;
        }
        return Ok(Displaced::Deleted);
    }

    let backup = backup_path(link);
    ctx.narrate(&format!(
        "{} already exists... moving to {}",
        link.display(),
        backup.display()
    ));
    if ctx.fs_ops.entry_exists(&backup) || (ctx.dry_run() && planned.has_backup(&backup)) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("backup {} already exists", backup.display()),
        ));
    }
    if ctx.dry_run() {
        planned.add_backup(&backup);
    } else {
        ctx.fs_ops.rename(link, &backup)?;
    }
    Ok(Displaced::BackedUp(backup))
}
