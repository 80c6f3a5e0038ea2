use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto a tracing filter directive.
///
/// Accepts the Python-style names offered on the command line as well as
/// tracing's own lowercase names; anything unknown is passed through so
/// `EnvFilter` can interpret full directives such as `pageviews_data=debug`.
pub fn filter_directive(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        // tracing has no level above error.
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `"info"` if the directive is not understood.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_maps_cli_names() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
    }

    #[test]
    fn test_filter_directive_critical_is_quietest() {
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("critical"), "error");
        assert_ne!(filter_directive("CRITICAL"), filter_directive("DEBUG"));
    }

    #[test]
    fn test_filter_directive_case_insensitive() {
        assert_eq!(filter_directive("warning"), "warn");
        assert_eq!(filter_directive("Info"), "info");
    }

    #[test]
    fn test_filter_directive_passes_through_directives() {
        assert_eq!(
            filter_directive("pageviews_data=trace"),
            "pageviews_data=trace"
        );
    }
}
