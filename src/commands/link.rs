//! Command: link every tracked file for this host into a destination.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::engine::{LinkStats, make_links};
use crate::logging::Log;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails, the run aborts, or any link could not be
/// made.
pub fn run(
    global: &GlobalOpts,
    opts: &LinkOpts,
    verbose: bool,
    log: Arc<dyn Log>,
) -> Result<LinkStats> {
    let setup = super::CommandSetup::init(global, verbose, Arc::clone(&log))?;
    log.stage(&format!("Linking into {}", opts.destination.display()));
    Ok(make_links(&setup.ctx, &opts.destination)?)
}
