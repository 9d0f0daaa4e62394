use tracing::Level;

/// Parse a verbosity name. Unknown names yield `None`.
pub fn parse_level(verbosity: &str) -> Option<Level> {
    match verbosity.trim().to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the result lines printed on stdout.
pub fn init_logger(verbosity: &str) {
    let level = parse_level(verbosity).unwrap_or_else(|| {
        eprintln!("Invalid log level '{verbosity}', defaulting to WARN");
        Level::WARN
    });

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" Info "), Some(Level::INFO));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("ERROR"), Some(Level::ERROR));
    }

    #[test]
    fn unknown_level_is_none() {
        assert_eq!(parse_level("loud"), None);
        assert_eq!(parse_level(""), None);
    }
}
