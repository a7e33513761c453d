use tracing_subscriber::{EnvFilter, fmt};

/// Harness for driving a canvas frame by frame.
pub mod harness;

pub use harness::Harness;

/// Route `tracing` output to the test writer. The filter comes from
/// `RUST_LOG`; repeated calls are ignored.
pub fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
