//! Line classification for tunnel output.

use regex::Regex;

use crate::error::TunnelError;

/// Marker of the harmless warning ssh prints when no TTY is attached.
const PSEUDO_TERMINAL_WARNING: &str = "Pseudo-terminal";

/// Extracts the announced public address from tunnel stdout lines.
#[derive(Debug, Clone)]
pub struct UrlScanner {
    pattern: Regex,
}

impl UrlScanner {
    /// Compiles `pattern` into a scanner.
    ///
    /// # Errors
    ///
    /// Returns [`TunnelError::InvalidPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn new(pattern: &str) -> Result<Self, TunnelError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the first address in `line`, if any.
    #[must_use]
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern.find(line).map(|m| m.as_str())
    }
}

/// Returns `true` for stderr lines that are expected noise rather than
/// problems worth a warning.
#[must_use]
pub fn is_benign_diagnostic(line: &str) -> bool {
    line.contains(PSEUDO_TERMINAL_WARNING)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_URL_PATTERN;

    fn scanner() -> UrlScanner {
        let Ok(scanner) = UrlScanner::new(DEFAULT_URL_PATTERN) else {
            panic!("default pattern must compile");
        };
        scanner
    }

    #[test]
    fn finds_serveo_forwarding_line() {
        let line = "Forwarding HTTP traffic from https://a1b2-c3.serveo.net";
        assert_eq!(scanner().find(line), Some("https://a1b2-c3.serveo.net"));
    }

    #[test]
    fn first_url_in_line_wins() {
        let line = "http://one.serveo.net and https://two.serveo.net";
        assert_eq!(scanner().find(line), Some("http://one.serveo.net"));
    }

    #[test]
    fn unrelated_lines_do_not_match() {
        assert_eq!(scanner().find("Press g to start a GUI session"), None);
        assert_eq!(scanner().find("https://example.com"), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(
            UrlScanner::new("(unclosed"),
            Err(TunnelError::InvalidPattern(_))
        ));
    }

    #[test]
    fn pseudo_terminal_warning_is_benign() {
        assert!(is_benign_diagnostic(
            "Pseudo-terminal will not be allocated because stdin is not a terminal."
        ));
        assert!(!is_benign_diagnostic("ssh: connect to host serveo.net port 22: Connection refused"));
    }
}
