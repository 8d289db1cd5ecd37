use crate::diagnostic::Diagnostic;
use crate::error::{MendError, SuggestError};
use crate::options::Options;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Regex options the fix service may request, mapped onto what
/// `regex::RegexBuilder` can honor plus a replace-all switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub case_insensitive: bool,
    pub multiline: bool,
    pub dot_matches_new_line: bool,
    /// Substitute every match instead of only the first.
    pub replace_all: bool,
}

impl RegexFlags {
    /// Accepts both long names and the usual one-letter shorthands. Unknown
    /// names are ignored, so an inventive model cannot turn a usable patch
    /// into a malformed response.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut flags = Self::default();
        for name in names {
            match name.as_ref() {
                "case_insensitive" | "i" => flags.case_insensitive = true,
                "multiline" | "m" => flags.multiline = true,
                "dot_matches_new_line" | "s" => flags.dot_matches_new_line = true,
                "replace_all" | "g" => flags.replace_all = true,
                other => warn!(flag = other, "ignoring unknown regex flag"),
            }
        }
        flags
    }
}

/// A fix proposed by the service: a targeted regex patch, or a rewrite of
/// the whole file.
#[derive(Debug, Clone, PartialEq)]
pub enum FixSuggestion {
    Regex {
        pattern: String,
        replacement: String,
        flags: RegexFlags,
    },
    FullReplacement {
        content: String,
    },
}

/// Source of fix suggestions. The repair loop only sees this trait, so
/// tests script suggestions without a network.
pub trait FixSource {
    fn request_fix(
        &self,
        content: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<FixSuggestion, SuggestError>;
}

/// Wire shape of a reply. Exactly one of the regex triple and `content`
/// must be populated; anything else is a malformed response.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    replacement: Option<String>,
    #[serde(default)]
    flags: Option<Vec<String>>,
    #[serde(default)]
    content: Option<String>,
    /// Optional one-liner from the model; logged, never acted on.
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a raw model reply into a [`FixSuggestion`].
pub(crate) fn parse_suggestion(reply: &str) -> Result<FixSuggestion, SuggestError> {
    let cleaned = strip_markdown_fences(reply);
    let raw: RawSuggestion = serde_json::from_str(&cleaned)
        .map_err(|e| SuggestError::MalformedResponse(format!("reply is not valid JSON: {}", e)))?;

    if let Some(explanation) = raw.explanation.as_deref() {
        debug!(explanation, "fix explanation");
    }

    match (raw.pattern, raw.content) {
        (Some(pattern), None) => {
            let replacement = raw.replacement.ok_or_else(|| {
                SuggestError::MalformedResponse("regex fix without a replacement".to_string())
            })?;
            let flags = RegexFlags::from_names(&raw.flags.unwrap_or_default());
            Ok(FixSuggestion::Regex {
                pattern,
                replacement,
                flags,
            })
        }
        (None, Some(content)) => Ok(FixSuggestion::FullReplacement { content }),
        (Some(_), Some(_)) => Err(SuggestError::MalformedResponse(
            "reply populates both a regex fix and a full replacement".to_string(),
        )),
        (None, None) => Err(SuggestError::MalformedResponse(
            "reply carries neither a regex fix nor a full replacement".to_string(),
        )),
    }
}

/// Remove a leading ```` ```lang ```` fence and a trailing ```` ``` ````
/// fence. Models wrap structured replies in Markdown no matter how firmly
/// the instructions say not to.
pub(crate) fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    let opened = match fence_open_re() {
        Some(re) => re.replace(trimmed, ""),
        None => trimmed.into(),
    };
    let closed = match fence_close_re() {
        Some(re) => re.replace(&opened, ""),
        None => opened.clone(),
    };
    closed.trim().to_string()
}

fn fence_open_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9]*\r?\n?").ok())
        .as_ref()
}

fn fence_close_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```\s*$").ok()).as_ref()
}

const SYSTEM_INSTRUCTION: &str = "You are an assistant that fixes JSON syntax errors, \
including files that fail as Python source because a JSON file was run as a script. \
Respond with a single JSON object describing the fix and nothing else: either \
{\"pattern\": ..., \"replacement\": ..., \"flags\": [...]} for a regex substitution, \
or {\"content\": ...} carrying the entire corrected file. An optional \"explanation\" \
key may hold one short sentence. Do not add extra keys.";

/// Blocking Chat Completions client. One call per iteration, no streaming,
/// no caching: the content differs every time a fix lands, so identical
/// prompts never recur within a run.
pub struct OpenAiFixSource {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiFixSource {
    /// Reads the credential from `OPENAI_API_KEY` and an optional endpoint
    /// override from `JSONMEND_API_URL`. A missing credential is a startup
    /// configuration error, never a repair-loop failure.
    pub fn from_env(opts: &Options) -> Result<Self, MendError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MendError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let api_url = std::env::var("JSONMEND_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| opts.api_url.clone());
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.request_timeout)
            .build()
            .map_err(|e| MendError::Config(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model: opts.model.clone(),
            temperature: opts.temperature,
        })
    }

    fn build_prompt(content: &str, diagnostics: &[Diagnostic]) -> String {
        let mut errors = String::new();
        for diag in diagnostics {
            errors.push_str(&diag.to_string());
            errors.push('\n');
        }
        format!(
            "A JSON file failed validation; it may also have been run as a script in \
             another language by mistake.\n\n\
             Error output:\n---\n{errors}---\n\n\
             Current file content:\n---\n{content}\n---\n\n\
             Reply with one JSON object: either {{\"pattern\": \"...\", \"replacement\": \"...\", \
             \"flags\": [\"replace_all\"]}} to patch the file with a regex substitution, or \
             {{\"content\": \"...\"}} carrying the entire corrected file. \
             Return only that JSON object."
        )
    }
}

impl FixSource for OpenAiFixSource {
    fn request_fix(
        &self,
        content: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<FixSuggestion, SuggestError> {
        let prompt = Self::build_prompt(content, diagnostics);
        debug!(model = %self.model, prompt_bytes = prompt.len(), "requesting fix");

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .map_err(|e| SuggestError::Service(format!("request failed: {}", e)))?;
        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| SuggestError::Service(format!("reading response: {}", e)))?;
        if !status.is_success() {
            return Err(SuggestError::Service(format!("API {}: {}", status, text)));
        }

        let chat: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            SuggestError::MalformedResponse(format!("response envelope is not JSON: {}", e))
        })?;
        let reply = chat
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|a| a.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                SuggestError::MalformedResponse("no message content in response".to_string())
            })?;
        debug!(reply, "raw fix suggestion");

        parse_suggestion(reply)
    }
}
