use serde::Serialize;

/// One finding, optionally tied to a 1-based manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<usize>,
}

/// Validation outcome of a child playlist, keyed by its resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildPlaylistReport {
    pub uri: String,
    pub result: ValidationResult,
}

/// Findings of one validation pass, grouped by severity in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub info: Vec<Diagnostic>,
    pub media_playlists: Vec<ChildPlaylistReport>,
}

impl ValidationResult {
    pub fn error(&mut self, message: impl Into<String>, line: Option<usize>) {
        self.errors.push(Diagnostic { message: message.into(), line });
    }

    pub fn warning(&mut self, message: impl Into<String>, line: Option<usize>) {
        self.warnings.push(Diagnostic { message: message.into(), line });
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.info.push(Diagnostic { message: message.into(), line: None });
    }

    /// No errors at this level. Child playlist errors are summarized into `errors` too.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Result holding a single top-level error, for inputs that cannot be inspected at all.
    pub(crate) fn single_error(message: impl Into<String>) -> Self {
        let mut result = ValidationResult::default();
        result.error(message, None);
        result
    }
}

/// `1 error`, `2 errors`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
