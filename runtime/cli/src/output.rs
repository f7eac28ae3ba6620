//! CLI output formatting for JSON and JSONL modes.
//!
//! Machine-readable renditions of a token stream, for editors and scripts
//! that consume the lexer from outside Rust.

use lazylex::error::{LazylexError, LexError};
use lazylex::lexer::{Token, TokenAndPosition};
use serde::Serialize;
use std::io::{self, Write};

/// Output mode for CLI execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One token per line, `token @ line:column` (default)
    Text,
    /// Single JSON object once the whole input is tokenized
    Json,
    /// One JSON object per token as the stream is produced
    Jsonl,
}

impl OutputMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputMode::Text),
            "json" => Some(OutputMode::Json),
            "jsonl" => Some(OutputMode::Jsonl),
            _ => None,
        }
    }
}

/// Location with 1-indexed line and column.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A token as it appears in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct JsonToken {
    #[serde(rename = "type")]
    pub output_type: &'static str,
    pub kind: &'static str,
    pub value: serde_json::Value,
    pub location: Location,
}

impl JsonToken {
    pub fn from_token(token: &TokenAndPosition) -> Self {
        let value = match &token.token {
            Token::Terminal => serde_json::Value::Null,
            Token::UnknownCharacterError { c } => serde_json::Value::from(c.to_string()),
            Token::Id { value } | Token::String { value } => serde_json::Value::from(value.as_str()),
            // JSON has no infinity; keep it apart from the terminal's null.
            Token::FloatNumber { value } if !value.is_finite() => {
                serde_json::Value::from(value.to_string())
            }
            Token::FloatNumber { value } => serde_json::Value::from(value.into_inner()),
            Token::Symbol(symbol) => serde_json::Value::from(symbol.to_string()),
        };
        Self {
            output_type: "token",
            kind: token.token.kind(),
            value,
            location: Location {
                line: token.position.line,
                column: token.position.column,
            },
        }
    }
}

/// Token and error counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenSummary {
    pub total: usize,
    pub errors: usize,
}

impl TokenSummary {
    pub fn count(&mut self, token: &TokenAndPosition) {
        self.total += 1;
        if token.token.is_error() {
            self.errors += 1;
        }
    }
}

/// JSON output for a tokenized input.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTokenizeOutput {
    #[serde(rename = "type")]
    pub output_type: &'static str,
    pub success: bool,
    pub summary: TokenSummary,
    pub tokens: Vec<JsonToken>,
    pub errors: Vec<JsonErrorOutput>,
}

/// JSON output for errors.
#[derive(Debug, Clone, Serialize)]
pub struct JsonErrorOutput {
    #[serde(rename = "type")]
    pub output_type: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Final JSONL line.
#[derive(Debug, Clone, Serialize)]
pub struct JsonlSummary {
    #[serde(rename = "type")]
    pub output_type: &'static str,
    pub success: bool,
    pub summary: TokenSummary,
}

/// Format a LazylexError as JSON error output.
pub fn format_error_json(error: &LazylexError) -> JsonErrorOutput {
    match error {
        LazylexError::Lex(err) => JsonErrorOutput {
            output_type: "error",
            message: err.message.clone(),
            location: Some(Location {
                line: err.position.line,
                column: err.position.column,
            }),
        },
        LazylexError::Interval(err) => JsonErrorOutput {
            output_type: "error",
            message: err.to_string(),
            location: None,
        },
    }
}

/// Format a complete token list as JSON.
pub fn format_tokens_json(tokens: &[TokenAndPosition]) -> serde_json::Result<String> {
    let mut summary = TokenSummary::default();
    let mut errors = Vec::new();
    for token in tokens {
        summary.count(token);
        if let Some(err) = LexError::from_token(token) {
            errors.push(format_error_json(&LazylexError::from(err)));
        }
    }

    let output = JsonTokenizeOutput {
        output_type: "tokenize",
        success: summary.errors == 0,
        summary,
        tokens: tokens.iter().map(JsonToken::from_token).collect(),
        errors,
    };
    serde_json::to_string(&output)
}

// ============================================================================
// JSONL Streaming Support
// ============================================================================

/// JSONL streaming writer.
pub struct JsonlWriter<W: Write> {
    writer: W,
    summary: TokenSummary,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            summary: TokenSummary::default(),
        }
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }

    /// Write one token line.
    pub fn write_token(&mut self, token: &TokenAndPosition) -> io::Result<()> {
        self.summary.count(token);
        self.write_line(&JsonToken::from_token(token))
    }

    /// Write the summary line and return the counts.
    pub fn finish(mut self) -> io::Result<TokenSummary> {
        let summary = JsonlSummary {
            output_type: "summary",
            success: self.summary.errors == 0,
            summary: self.summary.clone(),
        };
        self.write_line(&summary)?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazylex::lexer::Lexer;

    #[test]
    fn test_output_mode_parse() {
        assert_eq!(OutputMode::parse("text"), Some(OutputMode::Text));
        assert_eq!(OutputMode::parse("json"), Some(OutputMode::Json));
        assert_eq!(OutputMode::parse("jsonl"), Some(OutputMode::Jsonl));
        assert_eq!(OutputMode::parse("yaml"), None);
    }

    #[test]
    fn test_tokens_json() {
        let tokens = Lexer::new("{\"a\": 1.5 #").tokenize();
        let json = format_tokens_json(&tokens).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["type"], "tokenize");
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["summary"]["total"], 6);
        assert_eq!(parsed["summary"]["errors"], 1);
        assert_eq!(parsed["tokens"][1]["kind"], "string");
        assert_eq!(parsed["tokens"][1]["value"], "a");
        assert_eq!(parsed["tokens"][3]["value"], 1.5);
        assert_eq!(parsed["tokens"][5]["kind"], "terminal");
        assert_eq!(parsed["tokens"][5]["value"], serde_json::Value::Null);
        assert_eq!(parsed["errors"][0]["location"]["column"], 11);
    }

    #[test]
    fn test_overflowing_number_is_not_null() {
        let tokens = Lexer::new("1e999").tokenize();
        let token = JsonToken::from_token(&tokens[0]);
        assert_eq!(token.kind, "float_number");
        assert_eq!(token.value, serde_json::Value::from("inf"));
        assert_eq!(JsonToken::from_token(&tokens[1]).value, serde_json::Value::Null);
    }

    #[test]
    fn test_jsonl_writer() {
        let mut buffer = Vec::new();
        let mut writer = JsonlWriter::new(&mut buffer);
        for token in Lexer::new("[x]").tokens() {
            writer.write_token(&token).unwrap();
        }
        let summary = writer.finish().unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.errors, 0);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("\"kind\":\"id\""));
        assert!(lines[4].contains("\"type\":\"summary\""));
    }
}
