use super::Position;
use ordered_float::OrderedFloat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftBrace,    // {
    RightBrace,   // }
    Colon,        // :
    Comma,        // ,
    LeftBracket,  // [
    RightBracket, // ]
    Minus,        // -
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '{' => Some(Symbol::LeftBrace),
            '}' => Some(Symbol::RightBrace),
            ':' => Some(Symbol::Colon),
            ',' => Some(Symbol::Comma),
            '[' => Some(Symbol::LeftBracket),
            ']' => Some(Symbol::RightBracket),
            '-' => Some(Symbol::Minus),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::LeftBrace => '{',
            Symbol::RightBrace => '}',
            Symbol::Colon => ':',
            Symbol::Comma => ',',
            Symbol::LeftBracket => '[',
            Symbol::RightBracket => ']',
            Symbol::Minus => '-',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    // End of input
    Terminal,

    // Recoverable error, scanning continues after it
    UnknownCharacterError { c: char },

    Id { value: String },
    FloatNumber { value: OrderedFloat<f64> },
    Symbol(Symbol),
    String { value: String },
}

impl Token {
    pub fn is_error(&self) -> bool {
        matches!(self, Token::UnknownCharacterError { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Token::Terminal => "terminal",
            Token::UnknownCharacterError { .. } => "unknown_character_error",
            Token::Id { .. } => "id",
            Token::FloatNumber { .. } => "float_number",
            Token::Symbol(_) => "symbol",
            Token::String { .. } => "string",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Terminal => write!(f, "Terminal"),
            Token::UnknownCharacterError { c } => write!(f, "UnknownCharacterError({c:?})"),
            Token::Id { value } => write!(f, "Id({value:?})"),
            Token::FloatNumber { value } => write!(f, "FloatNumber({value})"),
            Token::Symbol(symbol) => write!(f, "Symbol({symbol})"),
            Token::String { value } => write!(f, "String({value:?})"),
        }
    }
}

/// A token and the position of its first character. `Terminal` sits just
/// past the last character of the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenAndPosition {
    pub token: Token,
    pub position: Position,
}

impl TokenAndPosition {
    pub fn new(token: Token, position: Position) -> Self {
        Self { token, position }
    }
}

impl fmt::Display for TokenAndPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.token, self.position)
    }
}
