use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Total order over keys. `Ordering::Less` means the first key precedes the second.
pub type Compare<E> = Rc<dyn Fn(&E, &E) -> Ordering>;

/// Equality over values, used to keep interval sequences minimal.
pub type Equal<T> = Rc<dyn Fn(&T, &T) -> bool>;

pub fn natural_compare<E: Ord>() -> Compare<E> {
    Rc::new(|a: &E, b: &E| a.cmp(b))
}

pub fn strict_equal<T: PartialEq>() -> Equal<T> {
    Rc::new(|a: &T, b: &T| a == b)
}

/// Key ordering and value equality supplied by every caller of the interval
/// library.
pub struct Strategy<E, T> {
    pub compare: Compare<E>,
    pub equal: Equal<T>,
}

impl<E, T> Strategy<E, T> {
    pub fn new(
        compare: impl Fn(&E, &E) -> Ordering + 'static,
        equal: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self {
            compare: Rc::new(compare),
            equal: Rc::new(equal),
        }
    }

    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.compare)(a, b)
    }

    pub fn equal(&self, a: &T, b: &T) -> bool {
        (self.equal)(a, b)
    }

    /// Same key order, different value type.
    pub fn with_equal<R>(&self, equal: impl Fn(&R, &R) -> bool + 'static) -> Strategy<E, R> {
        Strategy {
            compare: self.compare.clone(),
            equal: Rc::new(equal),
        }
    }
}

impl<E: Ord, T: PartialEq> Strategy<E, T> {
    pub fn natural() -> Self {
        Self {
            compare: natural_compare(),
            equal: strict_equal(),
        }
    }
}

impl<E, T> Clone for Strategy<E, T> {
    fn clone(&self) -> Self {
        Self {
            compare: self.compare.clone(),
            equal: self.equal.clone(),
        }
    }
}

impl<E, T> fmt::Debug for Strategy<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn natural_strategy_orders_keys() {
        let strategy = Strategy::<i32, &str>::natural();
        assert_eq!(strategy.compare(&1, &2), Ordering::Less);
        assert_eq!(strategy.compare(&2, &2), Ordering::Equal);
        assert_eq!(strategy.compare(&3, &2), Ordering::Greater);
        assert!(strategy.equal(&"a", &"a"));
        assert!(!strategy.equal(&"a", &"b"));
    }

    #[test]
    fn float_keys_through_ordered_float() {
        let strategy = Strategy::<OrderedFloat<f64>, u8>::natural();
        assert_eq!(
            strategy.compare(&OrderedFloat(0.5), &OrderedFloat(1.5)),
            Ordering::Less
        );
    }

    #[test]
    fn with_equal_keeps_key_order() {
        let strategy = Strategy::<i32, i32>::natural();
        let loose = strategy.with_equal(|a: &String, b: &String| a.eq_ignore_ascii_case(b));
        assert_eq!(loose.compare(&5, &1), Ordering::Greater);
        assert!(loose.equal(&"ABC".to_string(), &"abc".to_string()));
    }
}
