use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;

pub const LOG_ENV: &str = "HATCH_FILL_LOG";

/// Console filter from a `Targets` directive string such as
/// `hatch_fill_driver=trace`. Anything unparseable falls back to `warn`.
pub fn console_filter(directives: Option<&str>) -> Targets {
    directives
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(LevelFilter::WARN))
}

pub fn logging() {
    use tracing_subscriber::{fmt, prelude::*};

    let directives = std::env::var(LOG_ENV).ok();
    let console_filter = console_filter(directives.as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(true)
                .with_filter(console_filter),
        )
        .init();
}
