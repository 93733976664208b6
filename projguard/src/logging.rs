use tracing::metadata::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. The filter string follows the usual
/// `RUST_LOG` syntax; an unparsable filter falls back to `info`.
pub fn init(level_regex: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(level_regex)
        .unwrap_or_else(|err| {
            eprintln!("invalid log filter {level_regex:?}: {err}");
            EnvFilter::new("info")
        });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
