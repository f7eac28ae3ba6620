mod charset;
mod number;
mod position;
mod state;
mod token;


pub use charset::{CharClasses, CharSet};
pub use number::Number;
pub use position::{CharAndPosition, Position, add_position, source_chars};
pub use state::{LexState, NumberPhase, StringPhase, Text};
pub use token::{Symbol, Token, TokenAndPosition};

use crate::error::LexError;
use crate::sequence::Sequence;
use std::rc::Rc;
use tracing::{debug, trace};

/// Lazily tokenizes a position-tagged character stream with the default
/// character classes. The stream ends with a single `Terminal` token.
pub fn tokenize(chars: Sequence<CharAndPosition>) -> Sequence<TokenAndPosition> {
    tokenize_with(Rc::new(CharClasses::new()), chars)
}

pub fn tokenize_with(
    classes: Rc<CharClasses>,
    chars: Sequence<CharAndPosition>,
) -> Sequence<TokenAndPosition> {
    chars.flat_scan(LexState::WhiteSpace, move |state, input| {
        state.step(&classes, input)
    })
}

pub struct Lexer {
    source: Rc<str>,
    classes: Rc<CharClasses>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::with_classes(source, Rc::new(CharClasses::new()))
    }

    pub fn with_classes(source: &str, classes: Rc<CharClasses>) -> Self {
        Self {
            source: Rc::from(source),
            classes,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lazy token stream. Nothing is scanned until tokens are demanded.
    pub fn tokens(&self) -> Sequence<TokenAndPosition> {
        let chars = add_position(source_chars(self.source.clone()));
        tokenize_with(self.classes.clone(), chars)
    }

    pub fn tokenize(&self) -> Vec<TokenAndPosition> {
        let tokens: Vec<TokenAndPosition> = self.tokens().iter().collect();
        let errors = tokens
            .iter()
            .filter(|token| token.token.is_error())
            .inspect(|token| trace!(%token, "error token"))
            .count();
        debug!(tokens = tokens.len(), errors, "tokenized source");
        tokens
    }

    /// Every error token of the source, as diagnostics.
    pub fn errors(&self) -> Vec<LexError> {
        self.tokens().iter().filter_map(|token| LexError::from_token(&token)).collect()
    }
}
