//! Command: print version information.

/// Version string baked in by the build script, or `dev-<crate version>`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("LINKER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")))
}

/// Print the linker version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("linker {}", version());
}
