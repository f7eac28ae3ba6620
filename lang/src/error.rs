use crate::lexer::{Position, Token, TokenAndPosition};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// Breakpoint `index` does not come strictly after its predecessor.
    UnorderedEdges { index: usize },
}

impl fmt::Display for IntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalError::UnorderedEdges { index } => write!(
                f,
                "breakpoint {index} does not follow its predecessor in key order"
            ),
        }
    }
}

impl std::error::Error for IntervalError {}

/// Diagnostic for an error token found in the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn from_token(token: &TokenAndPosition) -> Option<Self> {
        match token.token {
            Token::UnknownCharacterError { c } => Some(Self {
                message: format!("Unknown character {c:?}"),
                position: token.position,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

/// Unified error type for the crate
#[derive(Debug)]
pub enum LazylexError {
    Lex(LexError),
    Interval(IntervalError),
}

impl From<LexError> for LazylexError {
    fn from(err: LexError) -> Self {
        LazylexError::Lex(err)
    }
}

impl From<IntervalError> for LazylexError {
    fn from(err: IntervalError) -> Self {
        LazylexError::Interval(err)
    }
}

impl fmt::Display for LazylexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazylexError::Lex(err) => write!(
                f,
                "Lexical error at line {}, column {}: {}",
                err.position.line, err.position.column, err.message
            ),
            LazylexError::Interval(err) => write!(f, "Interval error: {err}"),
        }
    }
}

impl std::error::Error for LazylexError {}

impl LazylexError {
    /// Format error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let LazylexError::Lex(err) = self else {
            return format!("\n{self}\n");
        };
        let Position { line, column } = err.position;
        let message = &err.message;

        let mut output = String::new();
        output.push_str(&format!(
            "\nLexical error at line {line}, column {column}: {message}\n\n"
        ));

        // Two lines of context either side
        let lines: Vec<&str> = source.lines().collect();
        let error_line_idx = (line as usize).saturating_sub(1);
        let start = error_line_idx.saturating_sub(2);
        let end = (error_line_idx + 3).min(lines.len());

        for (idx, line_content) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = idx + 1;
            if idx == error_line_idx {
                output.push_str(&format!(" → {:4} | {}\n", line_num, line_content));
                output.push_str("        | ");
                output.push_str(&" ".repeat((column as usize).saturating_sub(1)));
                output.push_str("^\n");
            } else {
                output.push_str(&format!("   {:4} | {}\n", line_num, line_content));
            }
        }

        output
    }

    /// Format error with source context and colored output
    #[cfg(feature = "colored")]
    pub fn format_colored(&self, source: &str) -> String {
        use colored::Colorize;

        let (line, column, message) = match self {
            LazylexError::Lex(err) => (err.position.line, err.position.column, &err.message),
            LazylexError::Interval(_) => {
                return format!("\n{}\n", self.to_string().red().bold());
            }
        };

        let mut output = String::new();
        output.push('\n');
        output.push_str(
            &format!("Lexical error at line {line}, column {column}")
                .red()
                .bold()
                .to_string(),
        );
        output.push_str(&format!(": {}\n\n", message.red()));

        let lines: Vec<&str> = source.lines().collect();
        let error_line_idx = (line as usize).saturating_sub(1);
        let start = error_line_idx.saturating_sub(2);
        let end = (error_line_idx + 3).min(lines.len());

        for (idx, line_content) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = idx + 1;
            if idx == error_line_idx {
                output.push_str(
                    &format!(" → {:4} | {}\n", line_num, line_content)
                        .red()
                        .to_string(),
                );
                output.push_str(&"        | ".red().to_string());
                output.push_str(&" ".repeat((column as usize).saturating_sub(1)));
                output.push_str(&"^".red().bold().to_string());
                output.push('\n');
            } else {
                output.push_str(
                    &format!("   {:4} | {}\n", line_num, line_content)
                        .dimmed()
                        .to_string(),
                );
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn lex_error(message: &str, line: u32, column: u32) -> LazylexError {
        LazylexError::Lex(LexError {
            message: message.to_string(),
            position: Position::new(line, column),
        })
    }

    #[test]
    fn lex_error_display() {
        let display = lex_error("Unknown character '#'", 5, 10).to_string();
        assert!(display.contains("Lexical error"));
        assert!(display.contains("line 5"));
        assert!(display.contains("column 10"));
        assert!(display.contains("Unknown character '#'"));
    }

    #[test]
    fn interval_error_display() {
        let err = LazylexError::from(IntervalError::UnorderedEdges { index: 3 });
        assert_eq!(
            err.to_string(),
            "Interval error: breakpoint 3 does not follow its predecessor in key order"
        );
        assert_eq!(err.format_with_source("ignored"), format!("\n{err}\n"));
    }

    #[test]
    fn error_from_token() {
        let errors = Lexer::new("{ \"a\": # }").errors();
        assert_eq!(
            errors,
            vec![LexError {
                message: "Unknown character '#'".to_string(),
                position: Position::new(1, 8),
            }]
        );
        assert!(Lexer::new("[1, 2]").errors().is_empty());
    }

    #[test]
    fn error_with_source_context() {
        let source = "{\n  \"a\": 1,\n  \"b\": 2,\n  \"c\": %,\n  \"d\": 4,\n  \"e\": 5\n}";
        let formatted = lex_error("Unknown character '%'", 4, 8).format_with_source(source);

        assert!(formatted.contains("line 4"));
        assert!(!formatted.contains("{\n"));
        assert!(formatted.contains("\"a\": 1"));
        assert!(formatted.contains("\"b\": 2"));
        assert!(formatted.contains("\"c\": %"));
        assert!(formatted.contains("\"d\": 4"));
        assert!(formatted.contains("\"e\": 5"));
    }

    #[test]
    fn error_with_caret_position() {
        let formatted = lex_error("Unknown character '@'", 1, 13).format_with_source("[1, 2, 3, 4, @]");
        assert!(formatted.contains("        |             ^"));
    }

    #[test]
    fn error_beyond_last_line() {
        let formatted = lex_error("Unknown character '?'", 100, 1).format_with_source("[]");
        assert!(formatted.contains("Lexical error at line 100"));
    }
}
