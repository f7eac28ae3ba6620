mod map;


pub use map::IntervalMap;

use crate::error::IntervalError;
use crate::sequence::Sequence;
use crate::strategy::{Compare, Equal, Strategy};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A key at which the step function takes a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breakpoint<E, T> {
    pub edge: E,
    pub value: T,
}

impl<E, T> Breakpoint<E, T> {
    pub fn new(edge: E, value: T) -> Self {
        Self { edge, value }
    }
}

/// Closed-open interval `[min, max)` tagged with a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<E, T> {
    pub min: E,
    pub max: E,
    pub value: T,
}

impl<E, T> Interval<E, T> {
    pub fn new(min: E, max: E, value: T) -> Self {
        Self { min, max, value }
    }
}

/// Total step function over an ordered key domain.
///
/// Keys before the first breakpoint map to `first`; any other key maps to
/// the value of the last breakpoint whose edge is not greater than it. Edges
/// are strictly increasing and, for sequences produced by this module, no
/// breakpoint repeats the value in force before it.
#[derive(Clone, PartialEq)]
pub struct IntervalSequence<E, T> {
    pub first: T,
    pub rest: Sequence<Breakpoint<E, T>>,
}

impl<E: Clone + 'static, T: Clone + 'static> IntervalSequence<E, T> {
    pub fn constant(value: T) -> Self {
        Self {
            first: value,
            rest: Sequence::empty(),
        }
    }

    /// Wraps an existing breakpoint stream without checking it.
    pub fn new(first: T, rest: Sequence<Breakpoint<E, T>>) -> Self {
        Self { first, rest }
    }

    /// Builds a minimal sequence from `(edge, value)` pairs.
    ///
    /// Edges must be strictly increasing; the error names the first pair that
    /// breaks the order. Pairs repeating the value in force are dropped.
    pub fn from_breakpoints(
        first: T,
        pairs: impl IntoIterator<Item = (E, T)>,
        strategy: &Strategy<E, T>,
    ) -> Result<Self, IntervalError> {
        let mut breakpoints: Vec<Breakpoint<E, T>> = Vec::new();
        let mut last_edge: Option<E> = None;

        for (index, (edge, value)) in pairs.into_iter().enumerate() {
            if let Some(last) = &last_edge
                && strategy.compare(last, &edge) != Ordering::Less
            {
                return Err(IntervalError::UnorderedEdges { index });
            }
            last_edge = Some(edge.clone());

            let previous = breakpoints.last().map_or(&first, |b| &b.value);
            if !strategy.equal(previous, &value) {
                breakpoints.push(Breakpoint::new(edge, value));
            }
        }

        Ok(Self {
            first,
            rest: Sequence::from_array(breakpoints),
        })
    }

    /// Inserts `interval`, overwriting the values strictly inside
    /// `[min, max)` and keeping everything else. An empty interval is a no-op.
    pub fn add(&self, strategy: &Strategy<E, T>, interval: Interval<E, T>) -> Self {
        let Interval { min, max, value } = interval;
        if strategy.compare(&min, &max) != Ordering::Less {
            return self.clone();
        }

        let patch = IntervalSequence::new(
            None,
            Sequence::from_array([Breakpoint::new(min, Some(value)), Breakpoint::new(max, None)]),
        );
        merge(self, &patch, strategy, |current: &T, patch: &Option<T>| {
            patch.clone().unwrap_or_else(|| current.clone())
        })
    }

    /// Transforms every value, merging neighbours that `f` made equal.
    pub fn map<R: Clone + 'static>(
        &self,
        equal: impl Fn(&R, &R) -> bool + 'static,
        f: impl Fn(&T) -> R + 'static,
    ) -> IntervalSequence<E, R> {
        let first = f(&self.first);
        let mapped = self
            .rest
            .map(move |breakpoint| Breakpoint::new(breakpoint.edge, f(&breakpoint.value)));
        IntervalSequence {
            rest: dedup_breakpoints(first.clone(), mapped, Rc::new(equal)),
            first,
        }
    }

    /// Linear point lookup.
    pub fn get(&self, strategy: &Strategy<E, T>, key: &E) -> T {
        let mut value = self.first.clone();
        for breakpoint in self.rest.iter() {
            if strategy.compare(&breakpoint.edge, key) == Ordering::Greater {
                break;
            }
            value = breakpoint.value;
        }
        value
    }

    pub fn breakpoints(&self) -> Vec<Breakpoint<E, T>> {
        self.rest.to_vec()
    }

    /// Number of breakpoints. Forces the sequence.
    pub fn len(&self) -> usize {
        self.rest.size()
    }

    pub fn is_constant(&self) -> bool {
        self.rest.is_empty()
    }

    /// Compiles the sequence into a balanced lookup tree.
    pub fn to_map(&self) -> IntervalMap<E, T> {
        IntervalMap::balanced(self)
    }
}

/// Pointwise combination of two step functions.
///
/// Both breakpoint streams are walked lazily in edge order; a shared edge
/// yields a single breakpoint. The result is kept minimal with the equality
/// of `strategy`.
pub fn merge<E, A, B, R>(
    a: &IntervalSequence<E, A>,
    b: &IntervalSequence<E, B>,
    strategy: &Strategy<E, R>,
    reduce: impl Fn(&A, &B) -> R + 'static,
) -> IntervalSequence<E, R>
where
    E: Clone + 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + 'static,
{
    let first = reduce(&a.first, &b.first);
    let cursor = Cursor {
        a_value: a.first.clone(),
        a_rest: a.rest.clone(),
        b_value: b.first.clone(),
        b_rest: b.rest.clone(),
    };
    let compare = strategy.compare.clone();
    let merged = Sequence::unfold(cursor, move |cursor| merge_step(&compare, &reduce, cursor));

    IntervalSequence {
        rest: dedup_breakpoints(first.clone(), merged, strategy.equal.clone()),
        first,
    }
}

struct Cursor<E, A, B> {
    a_value: A,
    a_rest: Sequence<Breakpoint<E, A>>,
    b_value: B,
    b_rest: Sequence<Breakpoint<E, B>>,
}

fn merge_step<E, A, B, R>(
    compare: &Compare<E>,
    reduce: &impl Fn(&A, &B) -> R,
    cursor: Cursor<E, A, B>,
) -> Option<(Breakpoint<E, R>, Cursor<E, A, B>)>
where
    E: Clone,
    A: Clone,
    B: Clone,
{
    let Cursor {
        mut a_value,
        mut a_rest,
        mut b_value,
        mut b_rest,
    } = cursor;

    let order = match (a_rest.first(), b_rest.first()) {
        (None, None) => return None,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(x), Some(y)) => compare(&x.edge, &y.edge),
    };

    let mut edge = None;
    if order != Ordering::Greater {
        let (breakpoint, tail) = a_rest.split_first()?;
        edge = Some(breakpoint.edge);
        a_value = breakpoint.value;
        a_rest = tail;
    }
    if order != Ordering::Less {
        let (breakpoint, tail) = b_rest.split_first()?;
        edge = edge.or(Some(breakpoint.edge));
        b_value = breakpoint.value;
        b_rest = tail;
    }

    let breakpoint = Breakpoint::new(edge?, reduce(&a_value, &b_value));
    let cursor = Cursor {
        a_value,
        a_rest,
        b_value,
        b_rest,
    };
    Some((breakpoint, cursor))
}

fn dedup_breakpoints<E, T>(
    first: T,
    breakpoints: Sequence<Breakpoint<E, T>>,
    equal: Equal<T>,
) -> Sequence<Breakpoint<E, T>>
where
    E: Clone + 'static,
    T: Clone + 'static,
{
    breakpoints.scan_filter(first, move |previous: T, breakpoint: Breakpoint<E, T>| {
        if equal(&previous, &breakpoint.value) {
            (previous, None)
        } else {
            (breakpoint.value.clone(), Some(breakpoint))
        }
    })
}

impl<E: Clone + fmt::Debug, T: Clone + fmt::Debug> fmt::Debug for IntervalSequence<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalSequence")
            .field("first", &self.first)
            .field("rest", &self.rest)
            .finish()
    }
}

/// Renders `first | edge: value | edge: value ...`.
impl<E: Clone + fmt::Display, T: Clone + fmt::Display> fmt::Display for IntervalSequence<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for breakpoint in self.rest.iter() {
            write!(f, " | {}: {}", breakpoint.edge, breakpoint.value)?;
        }
        Ok(())
    }
}
