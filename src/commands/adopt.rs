//! Command: move a live file into the source tree and link it back.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{AdoptOpts, GlobalOpts};
use crate::discovery::Bucket;
use crate::engine::{LinkStats, adopt_and_link};
use crate::logging::Log;

/// Run the adopt command.
///
/// # Errors
///
/// Returns an error if setup fails, the file cannot be moved, or the link
/// back could not be made.
pub fn run(
    global: &GlobalOpts,
    opts: &AdoptOpts,
    verbose: bool,
    log: Arc<dyn Log>,
) -> Result<LinkStats> {
    let setup = super::CommandSetup::init(global, verbose, Arc::clone(&log))?;
    let bucket = if opts.common {
        Bucket::Common
    } else {
        Bucket::for_host(setup.ctx.host())
    };
    log.stage(&format!("Adopting {} into {bucket}", opts.file.display()));
    Ok(adopt_and_link(&setup.ctx, &opts.file, opts.common)?)
}
