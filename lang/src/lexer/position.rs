use crate::sequence::{Sequence, State, Transition};
use std::fmt;
use std::rc::Rc;

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Position of the character following `c`.
    pub fn advance(self, c: char) -> Self {
        match c {
            '\n' => Self {
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A character tagged with its position. `c` is `None` exactly once, for the
/// end-of-input sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharAndPosition {
    pub c: Option<char>,
    pub position: Position,
}

/// Tags every character with its position and appends the sentinel, which
/// carries the position after the last character.
pub fn add_position(chars: Sequence<char>) -> Sequence<CharAndPosition> {
    chars
        .map(Some)
        .concat(Sequence::once(None))
        .inclusive_scan(tag(Position::START))
}

fn tag(position: Position) -> Transition<Option<char>, CharAndPosition> {
    Rc::new(move |c: Option<char>| {
        let next = c.map_or(position, |c| position.advance(c));
        State {
            value: CharAndPosition { c, position },
            next: tag(next),
        }
    })
}

/// Characters of `source`, produced on demand without copying the text.
pub fn source_chars(source: Rc<str>) -> Sequence<char> {
    Sequence::unfold(0, move |offset: usize| {
        let c = source.get(offset..)?.chars().next()?;
        Some((c, offset + c.len_utf8()))
    })
}
