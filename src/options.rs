use std::time::Duration;

/// Knobs for the repair loop and its external collaborators.
#[derive(Clone, Debug)]
pub struct Options {
    /// Upper bound on repair iterations before declaring the file unmendable.
    pub max_iterations: u32,
    /// External JSON linter consulted before the built-in parser. Absence of
    /// the tool silently falls back to the built-in parser.
    pub lint_tool: String,
    /// Interpreter used for the compile-only foreign-syntax probe. Absence
    /// degrades the probe to "no signal".
    pub probe_interpreter: String,
    /// Chat model asked for fix suggestions.
    pub model: String,
    /// Chat Completions endpoint. Overridable at runtime via `JSONMEND_API_URL`.
    pub api_url: String,
    /// Wall-clock limit for a single fix request.
    pub request_timeout: Duration,
    /// Sampling temperature for fix requests. Low on purpose: fixes should
    /// be conservative, not creative.
    pub temperature: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            lint_tool: "jsonlint-php".to_string(),
            probe_interpreter: "python3".to_string(),
            model: "gpt-4o".to_string(),
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            request_timeout: Duration::from_secs(60),
            temperature: 0.2,
        }
    }
}
