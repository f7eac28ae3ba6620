//! Lazy persistent sequences, interval-keyed step functions and a lexer for a
//! JSON-like grammar driven entirely by the sequence machinery.

pub mod error;
pub mod interval;
pub mod lexer;
pub mod sequence;
pub mod strategy;

pub use error::{IntervalError, LazylexError, LexError};
pub use interval::{Breakpoint, Interval, IntervalMap, IntervalSequence};
pub use lexer::{Lexer, Position, Token, TokenAndPosition};
pub use sequence::{Sequence, State};
pub use strategy::Strategy;
