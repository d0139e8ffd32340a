//! Logger installation.
//!
//! Every crate logs through the `log` facade. Binaries call [`init_logging`]
//! once at startup; tests may call it freely since repeated installation is
//! ignored.

use env_logger::{Builder, Env};

/// Install `env_logger`, honouring `RUST_LOG` and falling back to
/// `default_filter` (for example `"warn"` or `"reflow=debug"`).
///
/// Returns `false` when a logger was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    Builder::from_env(Env::default().filter_or("RUST_LOG", default_filter))
        .format_timestamp(None)
        .try_init()
        .is_ok()
}

/// Install a logger suitable for `cargo test` output capture.
pub fn init_test_logging() {
    let _ = Builder::from_env(Env::default().filter_or("RUST_LOG", "debug"))
        .is_test(true)
        .try_init();
}
