mod state;


pub use state::{State, Transition, accumulator};

use im_rc::Vector;
use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

type Suspended<T> = Box<dyn FnOnce() -> Sequence<T>>;
type Link<T> = Option<Rc<Node<T>>>;

/// Persistent, lazily evaluated singly linked sequence.
///
/// The head of a non-empty sequence is always evaluated. The rest is a
/// suspended computation that runs at most once; every clone of the sequence
/// observes the same, physically shared, remainder. Sequences may be
/// infinite, so only bounded consumers (`take`, `take_while`, `first`) are safe
/// on them.
pub struct Sequence<T> {
    head: Link<T>,
}

struct Node<T> {
    value: T,
    rest: Rest<T>,
}

struct Rest<T> {
    forced: OnceCell<Sequence<T>>,
    suspended: Cell<Option<Suspended<T>>>,
}

impl<T> Rest<T> {
    fn suspended(rest: Suspended<T>) -> Self {
        Self {
            forced: OnceCell::new(),
            suspended: Cell::new(Some(rest)),
        }
    }

    fn forced(rest: Sequence<T>) -> Self {
        Self {
            forced: OnceCell::from(rest),
            suspended: Cell::new(None),
        }
    }

    fn force(&self) -> &Sequence<T> {
        self.forced.get_or_init(|| match self.suspended.take() {
            Some(rest) => rest(),
            None => Sequence::empty(),
        })
    }

    fn link(&self) -> Link<T> {
        self.force().head.clone()
    }
}

impl<T> Sequence<T> {
    pub fn empty() -> Self {
        Self { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Sequence whose rest is already evaluated.
    pub fn prepend(value: T, rest: Sequence<T>) -> Self {
        Self {
            head: Some(Rc::new(Node {
                value,
                rest: Rest::forced(rest),
            })),
        }
    }

    pub fn once(value: T) -> Self {
        Self::prepend(value, Self::empty())
    }

    /// Sequence whose rest is computed on first demand.
    pub fn cons(value: T, rest: impl FnOnce() -> Sequence<T> + 'static) -> Self {
        Self {
            head: Some(Rc::new(Node {
                value,
                rest: Rest::suspended(Box::new(rest)),
            })),
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// Forces and returns the remainder. The rest of an empty sequence is empty.
    pub fn rest(&self) -> Sequence<T> {
        match &self.head {
            Some(node) => node.rest.force().clone(),
            None => Self::empty(),
        }
    }

    pub fn uncons(&self) -> Option<(&T, Sequence<T>)> {
        let node = self.head.as_ref()?;
        Some((&node.value, node.rest.force().clone()))
    }

    /// Number of elements. Forces the whole sequence.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut current = self.head.clone();
        while let Some(node) = current {
            count += 1;
            current = node.rest.link();
        }
        count
    }

    pub fn drop_while(&self, predicate: impl Fn(&T) -> bool) -> Sequence<T> {
        let mut current = self.head.clone();
        while let Some(node) = &current {
            if !predicate(&node.value) {
                break;
            }
            let next = node.rest.link();
            current = next;
        }
        Self { head: current }
    }

    /// Drives `state` through every element and returns the final state's value.
    pub fn exclusive_fold<R>(&self, state: State<T, R>) -> R
    where
        T: Clone,
    {
        let mut state = state;
        let mut current = self.head.clone();
        while let Some(node) = current {
            state = (state.next)(node.value.clone());
            current = node.rest.link();
        }
        state.value
    }
}

impl<T: Clone> Sequence<T> {
    pub fn split_first(&self) -> Option<(T, Sequence<T>)> {
        let node = self.head.as_ref()?;
        Some((node.value.clone(), node.rest.force().clone()))
    }

    pub fn iter(&self) -> Iter<T> {
        Iter {
            next: self.head.clone(),
        }
    }

    pub fn fold<A>(&self, init: A, f: impl Fn(A, T) -> A) -> A {
        let mut accumulator = init;
        let mut current = self.head.clone();
        while let Some(node) = current {
            accumulator = f(accumulator, node.value.clone());
            current = node.rest.link();
        }
        accumulator
    }

    pub fn last(&self) -> Option<T> {
        let mut current = self.head.clone()?;
        loop {
            let next = current.rest.link();
            match next {
                Some(next) => current = next,
                None => return Some(current.value.clone()),
            }
        }
    }

    /// Fully materialized reversal.
    pub fn reverse(&self) -> Sequence<T> {
        self.fold(Self::empty(), |reversed, value| Self::prepend(value, reversed))
    }

    pub fn to_vector(&self) -> Vector<T> {
        self.fold(Vector::new(), |mut items, value| {
            items.push_back(value);
            items
        })
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Clone + 'static> Sequence<T> {
    pub fn from_array(items: impl IntoIterator<Item = T>) -> Self {
        Self::from_vector(items.into_iter().collect())
    }

    pub fn from_vector(items: Vector<T>) -> Self {
        Self::indexed(items, 0)
    }

    fn indexed(items: Vector<T>, index: usize) -> Self {
        match items.get(index).cloned() {
            Some(value) => Self::cons(value, move || Self::indexed(items, index + 1)),
            None => Self::empty(),
        }
    }

    /// Corecursive generator: `step` yields the next element and seed, or ends
    /// the sequence with `None`. The first element is produced eagerly.
    pub fn unfold<S: 'static>(seed: S, step: impl Fn(S) -> Option<(T, S)> + 'static) -> Self {
        unfold_shared(seed, Rc::new(step))
    }

    pub fn repeat(value: T) -> Self {
        Self::cons(value.clone(), move || Self::repeat(value))
    }

    /// The single traversal primitive behind map, filter, dedup and the scans.
    ///
    /// `step` receives the carried state and an element and returns the next
    /// state plus an optional output. Elements without output are skipped in a
    /// loop, so long filtered runs do not grow the stack.
    pub fn scan_filter<S, R, F>(&self, state: S, step: F) -> Sequence<R>
    where
        S: 'static,
        R: 'static,
        F: Fn(S, T) -> (S, Option<R>) + 'static,
    {
        scan_filter_from(self.head.clone(), state, Rc::new(step))
    }

    pub fn map<R: 'static>(&self, f: impl Fn(T) -> R + 'static) -> Sequence<R> {
        self.scan_filter((), move |(), value| ((), Some(f(value))))
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        self.scan_filter((), move |(), value| {
            let keep = predicate(&value);
            ((), keep.then_some(value))
        })
    }

    /// Drops every element equal to the last emitted one.
    pub fn dedup(&self, equal: impl Fn(&T, &T) -> bool + 'static) -> Sequence<T> {
        self.scan_filter(None, move |previous: Option<T>, value| match previous {
            Some(previous) if equal(&previous, &value) => (Some(previous), None),
            _ => (Some(value.clone()), Some(value)),
        })
    }

    pub fn entries(&self) -> Sequence<(usize, T)> {
        self.scan_filter(0, |index, value| (index + 1, Some((index, value))))
    }

    /// Inclusive accumulator scan: emits the accumulator after each element.
    pub fn scan<A: Clone + 'static>(
        &self,
        init: A,
        f: impl Fn(&A, T) -> A + 'static,
    ) -> Sequence<A> {
        self.scan_filter(init, move |accumulator, value| {
            let next = f(&accumulator, value);
            (next.clone(), Some(next))
        })
    }

    /// Feeds every element to the current transition and emits the value of
    /// the state it produces.
    pub fn inclusive_scan<R: 'static>(&self, transition: Transition<T, R>) -> Sequence<R> {
        self.scan_filter(transition, |transition, item| {
            let State { value, next } = transition(item);
            (next, Some(value))
        })
    }

    /// Emits the value held before each element is fed to the state. The final
    /// state's value is not emitted; `exclusive_fold` returns it.
    pub fn exclusive_scan<R: 'static>(&self, state: State<T, R>) -> Sequence<R> {
        self.scan_filter(state, |state, item| {
            let State { value, next } = state;
            (next(item), Some(value))
        })
    }

    /// Scan where every element produces a (possibly empty) run of outputs.
    pub fn flat_scan<S, R, F>(&self, state: S, step: F) -> Sequence<R>
    where
        S: 'static,
        R: Clone + 'static,
        F: Fn(S, T) -> (S, Sequence<R>) + 'static,
    {
        self.scan_filter(state, move |state, value| {
            let (state, output) = step(state, value);
            let output = (!output.is_empty()).then_some(output);
            (state, output)
        })
        .flatten()
    }

    /// Lazily appends the sequence produced by `tail` once this one is exhausted.
    pub fn append_with(&self, tail: impl FnOnce() -> Sequence<T> + 'static) -> Sequence<T> {
        match &self.head {
            None => tail(),
            Some(node) => {
                let node = node.clone();
                Self::cons(node.value.clone(), move || node.rest.force().append_with(tail))
            }
        }
    }

    pub fn concat(&self, other: Sequence<T>) -> Sequence<T> {
        self.append_with(move || other)
    }

    /// The first `count` elements. The source is never forced past the last
    /// element taken.
    pub fn take(&self, count: usize) -> Sequence<T> {
        match &self.head {
            Some(node) if count == 1 => Self::once(node.value.clone()),
            Some(node) if count > 1 => {
                let node = node.clone();
                Self::cons(node.value.clone(), move || node.rest.force().take(count - 1))
            }
            _ => Self::empty(),
        }
    }

    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        take_while_shared(self.head.clone(), Rc::new(predicate))
    }
}

impl Sequence<()> {
    pub fn infinite() -> Self {
        Self::repeat(())
    }
}

impl<T: Clone + 'static> Sequence<Sequence<T>> {
    /// Lazy concatenation of every inner sequence. Empty inner sequences are
    /// skipped in a loop.
    pub fn flatten(&self) -> Sequence<T> {
        let mut outer = self.head.clone();
        while let Some(node) = outer {
            if !node.value.is_empty() {
                let inner = node.value.clone();
                return inner.append_with(move || node.rest.force().flatten());
            }
            outer = node.rest.link();
        }
        Sequence::empty()
    }
}

fn unfold_shared<T, S, F>(seed: S, step: Rc<F>) -> Sequence<T>
where
    T: 'static,
    S: 'static,
    F: Fn(S) -> Option<(T, S)> + 'static,
{
    match step(seed) {
        Some((value, seed)) => Sequence::cons(value, move || unfold_shared(seed, step)),
        None => Sequence::empty(),
    }
}

fn scan_filter_from<T, S, R, F>(mut source: Link<T>, mut state: S, step: Rc<F>) -> Sequence<R>
where
    T: Clone + 'static,
    S: 'static,
    R: 'static,
    F: Fn(S, T) -> (S, Option<R>) + 'static,
{
    while let Some(node) = source {
        let (next, output) = step(state, node.value.clone());
        state = next;
        match output {
            Some(output) => {
                return Sequence::cons(output, move || {
                    scan_filter_from(node.rest.link(), state, step)
                });
            }
            None => source = node.rest.link(),
        }
    }
    Sequence::empty()
}

fn take_while_shared<T, P>(source: Link<T>, predicate: Rc<P>) -> Sequence<T>
where
    T: Clone + 'static,
    P: Fn(&T) -> bool + 'static,
{
    match source {
        Some(node) if predicate(&node.value) => {
            Sequence::cons(node.value.clone(), move || {
                take_while_shared(node.rest.link(), predicate)
            })
        }
        _ => Sequence::empty(),
    }
}

// Unlinks forced nodes one at a time so dropping a long sequence does not recurse.
impl<T> Drop for Sequence<T> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(node) = head {
            head = match Rc::try_unwrap(node) {
                Ok(mut node) => node.rest.forced.take().and_then(|mut rest| rest.head.take()),
                Err(_) => None,
            };
        }
    }
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Element-wise comparison. Forces both sequences up to the first difference
/// or a physically shared suffix.
impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.head.clone();
        let mut right = other.head.clone();
        loop {
            match (left, right) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    if Rc::ptr_eq(&a, &b) {
                        return true;
                    }
                    if a.value != b.value {
                        return false;
                    }
                    left = a.rest.link();
                    right = b.rest.link();
                }
                _ => return false,
            }
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Owning iterator over a sequence. Nodes already passed are released as the
/// iterator advances unless another clone still holds them.
pub struct Iter<T> {
    next: Link<T>,
}

impl<T: Clone> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node = self.next.take()?;
        self.next = node.rest.link();
        Some(node.value.clone())
    }
}

impl<T: Clone> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T: Clone> IntoIterator for &Sequence<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_array(iter)
    }
}
