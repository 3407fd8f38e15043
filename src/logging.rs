//! Installs the `tracing` subscriber: the browser console on wasm, stderr
//! natively.

use tracing::level_filters::LevelFilter;

/// Install the subscriber. Calling this more than once is harmless.
#[cfg(not(target_family = "wasm"))]
pub fn init(level: LevelFilter) {
    use tracing_subscriber::EnvFilter;

    // `RUST_LOG` still wins over the command line level.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the subscriber. Calling this more than once is harmless.
#[cfg(target_family = "wasm")]
pub fn init(level: LevelFilter) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry()
        .with(level)
        .with(fmt_layer)
        .try_init();
}

#[cfg(all(test, not(target_family = "wasm")))]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init(LevelFilter::DEBUG);
        init(LevelFilter::WARN);
        tracing::debug!("still fine after a second init");
    }
}
