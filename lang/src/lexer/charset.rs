use crate::interval::{Interval, IntervalMap, IntervalSequence, merge};
use crate::strategy::Strategy;
use std::fmt;

/// A set of characters stored as a step function over code points.
///
/// Membership is answered by a balanced interval map compiled once at
/// construction.
#[derive(Clone)]
pub struct CharSet {
    ranges: IntervalSequence<u32, bool>,
    map: IntervalMap<u32, bool>,
    strategy: Strategy<u32, bool>,
}

impl CharSet {
    fn from_ranges(ranges: IntervalSequence<u32, bool>) -> Self {
        let map = ranges.to_map();
        Self {
            ranges,
            map,
            strategy: Strategy::natural(),
        }
    }

    pub fn empty() -> Self {
        Self::from_ranges(IntervalSequence::constant(false))
    }

    /// Inclusive range `first..=last`.
    pub fn range(first: char, last: char) -> Self {
        let strategy = Strategy::natural();
        let interval = Interval::new(u32::from(first), u32::from(last) + 1, true);
        Self::from_ranges(IntervalSequence::constant(false).add(&strategy, interval))
    }

    pub fn one(c: char) -> Self {
        Self::range(c, c)
    }

    pub fn any(chars: &str) -> Self {
        chars
            .chars()
            .fold(Self::empty(), |set, c| set.union(&Self::one(c)))
    }

    pub fn union(&self, other: &CharSet) -> Self {
        let ranges = merge(&self.ranges, &other.ranges, &self.strategy, |a: &bool, b: &bool| {
            *a || *b
        });
        Self::from_ranges(ranges)
    }

    pub fn contains(&self, c: char) -> bool {
        *self.map.get(&self.strategy, &u32::from(c))
    }

    pub fn ranges(&self) -> &IntervalSequence<u32, bool> {
        &self.ranges
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        let mut start = None;
        for breakpoint in self.ranges.rest.iter() {
            match (start, breakpoint.value) {
                (None, true) => start = Some(breakpoint.edge),
                (Some(first), false) => {
                    set.entry(&(first..breakpoint.edge));
                    start = None;
                }
                _ => {}
            }
        }
        set.finish()
    }
}

/// Character classes driving the lexer.
#[derive(Debug, Clone)]
pub struct CharClasses {
    pub white_space: CharSet,
    pub letter: CharSet,
    pub digit: CharSet,
    pub id_start: CharSet,
    pub id_continue: CharSet,
    pub hex_digit: CharSet,
    pub exponent: CharSet,
}

impl CharClasses {
    pub fn new() -> Self {
        let white_space = CharSet::any(" \t\n\r");
        let letter = CharSet::range('A', 'Z').union(&CharSet::range('a', 'z'));
        let digit = CharSet::range('0', '9');
        let id_start = CharSet::any("$_").union(&letter);
        let id_continue = id_start.union(&digit);
        let hex_digit = digit
            .union(&CharSet::range('a', 'f'))
            .union(&CharSet::range('A', 'F'));
        let exponent = CharSet::any("eE");

        Self {
            white_space,
            letter,
            digit,
            id_start,
            id_continue,
            hex_digit,
            exponent,
        }
    }
}

impl Default for CharClasses {
    fn default() -> Self {
        Self::new()
    }
}
