use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Which check produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSource {
    JsonValidator,
    SyntaxProbe,
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSource::JsonValidator => f.write_str("json-validator"),
            DiagnosticSource::SyntaxProbe => f.write_str("syntax-probe"),
        }
    }
}

/// A normalized error record produced by a validation strategy or the
/// foreign-syntax prober. Rebuilt every iteration; never carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub message: String,
    /// 1-based line and column, when the producing tool reported one.
    pub position: Option<(u32, u32)>,
}

impl Diagnostic {
    pub fn new(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.position = Some((line, column));
        self
    }

    /// Best-effort extraction of a `line N[, column M]` position out of the
    /// message text. Tools phrase this differently ("at line 3 column 5",
    /// "line 1", python tracebacks), so the match is deliberately loose; a
    /// missing column defaults to 1.
    pub fn scrape_position(mut self) -> Self {
        if self.position.is_none()
            && let Some(re) = position_re()
            && let Some(caps) = re.captures(&self.message)
        {
            let line = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let column = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(1);
            if let Some(line) = line {
                self.position = Some((line, column));
            }
        }
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)?;
        if let Some((line, column)) = self.position {
            write!(f, " (line {}, column {})", line, column)?;
        }
        Ok(())
    }
}

fn position_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bline[ :]+(\d+)(?:\s*[,:]?\s*col(?:umn)?[ :]+(\d+))?").ok())
        .as_ref()
}
