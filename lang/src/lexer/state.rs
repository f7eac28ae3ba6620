use super::charset::CharClasses;
use super::number::Number;
use super::position::{CharAndPosition, Position};
use super::token::{Symbol, Token, TokenAndPosition};
use crate::sequence::Sequence;
use ordered_float::OrderedFloat;

type Step = (LexState, Sequence<TokenAndPosition>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPhase {
    BeforeDot,
    AfterDot,
    AfterE,
    AfterESign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPhase {
    Main,
    Escape,
    Unicode { code: u32, count: u8 },
}

/// Lexer state. Every state owns the text of the token it is building; a
/// step consumes the state and returns its successor with the tokens that
/// the character completed.
#[derive(Debug, Clone, PartialEq)]
pub enum LexState {
    WhiteSpace,
    Id {
        start: Position,
        value: String,
    },
    Number {
        start: Position,
        number: Number,
        phase: NumberPhase,
    },
    String {
        start: Position,
        text: Text,
        phase: StringPhase,
    },
    Terminal,
}

impl LexState {
    pub fn step(self, classes: &CharClasses, input: CharAndPosition) -> Step {
        match self {
            LexState::WhiteSpace => white_space(classes, input),
            LexState::Id { start, value } => identifier(classes, start, value, input),
            LexState::Number {
                start,
                number,
                phase,
            } => numeric(classes, start, number, phase, input),
            LexState::String { start, text, phase } => {
                string_literal(classes, start, text, phase, input)
            }
            LexState::Terminal => (LexState::Terminal, Sequence::empty()),
        }
    }
}

fn nothing(state: LexState) -> Step {
    (state, Sequence::empty())
}

// Emits a finished token, then hands the breaking character to `white_space`
// so it is dispatched exactly as if no token had preceded it.
fn emit(classes: &CharClasses, token: Token, start: Position, input: CharAndPosition) -> Step {
    let (state, tokens) = white_space(classes, input);
    (
        state,
        Sequence::prepend(TokenAndPosition::new(token, start), tokens),
    )
}

fn white_space(classes: &CharClasses, input: CharAndPosition) -> Step {
    let CharAndPosition { c, position } = input;
    let Some(c) = c else {
        let terminal = TokenAndPosition::new(Token::Terminal, position);
        return (LexState::Terminal, Sequence::once(terminal));
    };

    if classes.white_space.contains(c) {
        nothing(LexState::WhiteSpace)
    } else if classes.id_start.contains(c) {
        nothing(LexState::Id {
            start: position,
            value: c.to_string(),
        })
    } else if let Some(digit) = digit(classes, c) {
        nothing(LexState::Number {
            start: position,
            number: Number::from_digit(digit),
            phase: NumberPhase::BeforeDot,
        })
    } else if c == '"' {
        nothing(LexState::String {
            start: position,
            text: Text::default(),
            phase: StringPhase::Main,
        })
    } else {
        let token = match Symbol::from_char(c) {
            Some(symbol) => Token::Symbol(symbol),
            None => Token::UnknownCharacterError { c },
        };
        (
            LexState::WhiteSpace,
            Sequence::once(TokenAndPosition::new(token, position)),
        )
    }
}

fn digit(classes: &CharClasses, c: char) -> Option<u32> {
    if classes.digit.contains(c) {
        c.to_digit(10)
    } else {
        None
    }
}

fn hex_digit(classes: &CharClasses, c: char) -> Option<u32> {
    if classes.hex_digit.contains(c) {
        c.to_digit(16)
    } else {
        None
    }
}

fn identifier(
    classes: &CharClasses,
    start: Position,
    mut value: String,
    input: CharAndPosition,
) -> Step {
    if let Some(c) = input.c
        && classes.id_continue.contains(c)
    {
        value.push(c);
        return nothing(LexState::Id { start, value });
    }
    emit(classes, Token::Id { value }, start, input)
}

fn numeric(
    classes: &CharClasses,
    start: Position,
    number: Number,
    phase: NumberPhase,
    input: CharAndPosition,
) -> Step {
    let Some(c) = input.c else {
        return emit_number(classes, &number, start, input);
    };
    let digit = digit(classes, c);
    let exponent = classes.exponent.contains(c);

    let (number, phase) = match (phase, digit) {
        (NumberPhase::BeforeDot, Some(d)) => (number.integer_digit(d), phase),
        (NumberPhase::BeforeDot, None) if c == '.' => (number, NumberPhase::AfterDot),
        (NumberPhase::BeforeDot | NumberPhase::AfterDot, None) if exponent => {
            (number, NumberPhase::AfterE)
        }
        (NumberPhase::AfterDot, Some(d)) => (number.fraction_digit(d), phase),
        (NumberPhase::AfterE, None) if c == '-' => {
            (number.negate_exponent(), NumberPhase::AfterESign)
        }
        (NumberPhase::AfterE, None) if c == '+' => (number, NumberPhase::AfterESign),
        (NumberPhase::AfterE | NumberPhase::AfterESign, Some(d)) => {
            (number.exponent_digit(d), NumberPhase::AfterESign)
        }
        _ => return emit_number(classes, &number, start, input),
    };

    nothing(LexState::Number {
        start,
        number,
        phase,
    })
}

fn emit_number(
    classes: &CharClasses,
    number: &Number,
    start: Position,
    input: CharAndPosition,
) -> Step {
    let value = OrderedFloat(number.value());
    emit(classes, Token::FloatNumber { value }, start, input)
}

fn string_literal(
    classes: &CharClasses,
    start: Position,
    mut text: Text,
    phase: StringPhase,
    input: CharAndPosition,
) -> Step {
    // A raw newline or the end of input cuts the string short; the pending
    // escape text is kept and the breaking character is reprocessed.
    let Some(c) = input.c.filter(|c| *c != '\n') else {
        match phase {
            StringPhase::Main => {}
            StringPhase::Escape => text.push('\\'),
            StringPhase::Unicode { .. } => text.push_str("\\u"),
        }
        let value = text.finish();
        return emit(classes, Token::String { value }, start, input);
    };

    let phase = match phase {
        StringPhase::Main => match c {
            '"' => {
                let token = Token::String {
                    value: text.finish(),
                };
                return (
                    LexState::WhiteSpace,
                    Sequence::once(TokenAndPosition::new(token, start)),
                );
            }
            '\\' => StringPhase::Escape,
            _ => {
                text.push(c);
                StringPhase::Main
            }
        },
        StringPhase::Escape => {
            match c {
                '"' | '\\' | '/' => text.push(c),
                'b' => text.push('\u{8}'),
                'f' => text.push('\u{c}'),
                'n' => text.push('\n'),
                'r' => text.push('\r'),
                't' => text.push('\t'),
                'u' => {
                    let phase = StringPhase::Unicode { code: 0, count: 0 };
                    return nothing(string_state(start, text, phase));
                }
                _ => {
                    text.push('\\');
                    text.push(c);
                }
            }
            StringPhase::Main
        }
        StringPhase::Unicode { code, count } => match hex_digit(classes, c) {
            Some(d) if count == 3 => {
                text.push_unit(code * 16 + d);
                StringPhase::Main
            }
            Some(d) => StringPhase::Unicode {
                code: code * 16 + d,
                count: count + 1,
            },
            None => {
                text.push_str("\\u");
                return string_literal(classes, start, text, StringPhase::Main, input);
            }
        },
    };

    nothing(string_state(start, text, phase))
}

fn string_state(start: Position, text: Text, phase: StringPhase) -> LexState {
    LexState::String { start, text, phase }
}

/// String literal text. UTF-16 code units from `\u` escapes are paired
/// into scalar values; a surrogate that cannot be paired becomes U+FFFD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    value: String,
    high_surrogate: Option<u32>,
}

impl Text {
    fn flush(&mut self) {
        if self.high_surrogate.take().is_some() {
            self.value.push(char::REPLACEMENT_CHARACTER);
        }
    }

    pub fn push(&mut self, c: char) {
        self.flush();
        self.value.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.flush();
        self.value.push_str(s);
    }

    pub fn push_unit(&mut self, unit: u32) {
        match (self.high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let scalar = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
                self.value
                    .push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            (high, 0xD800..=0xDBFF) => {
                if high.is_some() {
                    self.value.push(char::REPLACEMENT_CHARACTER);
                }
                self.high_surrogate = Some(unit);
            }
            (high, _) => {
                if high.is_some() {
                    self.value.push(char::REPLACEMENT_CHARACTER);
                }
                self.value
                    .push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.value
    }
}
