use std::rc::Rc;

/// Reaction of a state machine to one input.
pub type Transition<I, O> = Rc<dyn Fn(I) -> State<I, O>>;

/// A state machine snapshot: the value it currently holds and how it moves on
/// the next input. States are immutable; stepping yields a fresh one.
pub struct State<I, O> {
    pub value: O,
    pub next: Transition<I, O>,
}

impl<I, O> State<I, O> {
    pub fn new(value: O, next: impl Fn(I) -> State<I, O> + 'static) -> Self {
        Self {
            value,
            next: Rc::new(next),
        }
    }

    pub fn step(&self, input: I) -> State<I, O> {
        (self.next)(input)
    }
}

impl<I, O: Clone> Clone for State<I, O> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            next: self.next.clone(),
        }
    }
}

/// State holding a running reduction, starting at `initial`.
pub fn accumulator<I, A>(reduce: impl Fn(&A, I) -> A + 'static, initial: A) -> State<I, A>
where
    I: 'static,
    A: Clone + 'static,
{
    accumulate(Rc::new(reduce), initial)
}

fn accumulate<I, A>(reduce: Rc<dyn Fn(&A, I) -> A>, value: A) -> State<I, A>
where
    I: 'static,
    A: Clone + 'static,
{
    let current = value.clone();
    State::new(value, move |input| {
        let next = reduce(&current, input);
        accumulate(reduce.clone(), next)
    })
}
