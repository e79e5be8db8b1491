//! Shared setup for the integration test binaries

use ctor::ctor;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness (filter with `RUST_LOG`)
#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
