use ahash::AHashMap;

/// Global default for the formula fail-on-error policy. Individual formula
/// expressions can override it; see the engine's formula module.
pub const STRICT_ERROR_HANDLING: &str = "report.engine.strict-error-handling";

/// Whether soft formula failures are logged.
pub const LOG_FORMULA_FAILURES: &str = "report.engine.log-formula-failures";

/// String key/value configuration for a report run.
///
/// Lookups are cheap and lenient: unknown keys and unparsable values fall
/// back to the caller-supplied default.
#[derive(Debug, Clone, Default)]
pub struct ReportConfiguration {
    entries: AHashMap<String, String>,
}

impl ReportConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => default,
            },
            None => default,
        }
    }
}
