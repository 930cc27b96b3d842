//! Dotfile linker.
//!
//! Keeps configuration files in a version-controlled source tree and
//! symlinks them into place. The tree holds one flat directory per bucket:
//! `common/` for every machine and `<hostname>/` for one machine. A stored
//! file's basename encodes where its link goes (see [`naming`]).
//!
//! The public API is organised into layers:
//!
//! - **[`naming`]**: pure basename to link path transformation and its inverse
//! - **[`discovery`]**: which stored files a run should link
//! - **[`resources`]**: the idempotent `check + apply` link primitive
//! - **[`engine`]**: whole runs (`make_links`, `adopt_and_link`) with
//!   per-target error isolation
//! - **[`commands`]**: subcommand orchestration for the `linker` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod logging;
pub mod naming;
pub mod operations;
pub mod platform;
pub mod resources;
