//! Deterministic inputs shared by the benchmark suites.

use lazylex::interval::{Breakpoint, IntervalSequence};
use lazylex::sequence::Sequence;
use ordered_float::OrderedFloat;

pub type Key = OrderedFloat<f64>;

/// A JSON array of `records` small objects, one per line.
pub fn json_document(records: usize) -> String {
    let mut source = String::from("[\n");
    for i in 0..records {
        let separator = if i + 1 == records { "" } else { "," };
        source.push_str(&format!(
            "  {{\"id\": {i}, \"name\": \"item\\u00e9{i}\", \"ratio\": {}.{}e-2, \"tags\": [true, null]}}{separator}\n",
            i % 97,
            i % 13
        ));
    }
    source.push(']');
    source
}

/// A step function with `breakpoints` edges spaced `spacing` apart,
/// starting at `offset`. Neighbouring values always differ.
pub fn step_function(breakpoints: usize, offset: f64, spacing: f64) -> IntervalSequence<Key, i64> {
    let rest: Vec<Breakpoint<Key, i64>> = (0..breakpoints)
        .map(|i| {
            let edge = OrderedFloat(offset + i as f64 * spacing);
            Breakpoint::new(edge, (i % 7) as i64)
        })
        .collect();
    IntervalSequence::new(-1, Sequence::from_array(rest))
}

/// `count` pseudo-random keys in `[0, span)`, same on every run.
pub fn probe_keys(count: usize, span: f64) -> Vec<Key> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            OrderedFloat(unit * span)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazylex::lexer::Lexer;

    #[test]
    fn json_document_tokenizes_cleanly() {
        let tokens = Lexer::new(&json_document(3)).tokenize();
        assert!(tokens.iter().all(|t| !t.token.is_error()));
    }

    #[test]
    fn step_function_is_minimal() {
        let steps = step_function(50, 0.0, 2.0);
        assert_eq!(steps.len(), 50);
        let breakpoints = steps.breakpoints();
        assert!(breakpoints.windows(2).all(|w| w[0].edge < w[1].edge && w[0].value != w[1].value));
        assert_ne!(steps.first, breakpoints[0].value);
    }

    #[test]
    fn probe_keys_stay_in_span() {
        let keys = probe_keys(1000, 10.0);
        assert_eq!(keys, probe_keys(1000, 10.0));
        assert!(keys.iter().all(|k| k.0 >= 0.0 && k.0 < 10.0));
    }
}
