// Powers of ten that are exact in an f64.
const EXACT_POWERS: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

const MAX_EXACT_MANTISSA: u64 = 1 << 53;

/// Decimal literal under construction: `digits * 10^(scale ± exponent)`.
///
/// Every significant digit is kept, so long literals still round correctly.
/// Leading zeros only move the scale. The exponent saturates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Number {
    digits: String,
    scale: i32,
    exponent: i32,
    negative_exponent: bool,
}

impl Number {
    pub fn from_digit(digit: u32) -> Self {
        Self::default().integer_digit(digit)
    }

    fn push_digit(&mut self, digit: u32) {
        if self.digits.is_empty() && digit == 0 {
            return;
        }
        if let Some(c) = char::from_digit(digit, 10) {
            self.digits.push(c);
        }
    }

    pub fn integer_digit(mut self, digit: u32) -> Self {
        self.push_digit(digit);
        self
    }

    pub fn fraction_digit(mut self, digit: u32) -> Self {
        self.push_digit(digit);
        self.scale = self.scale.saturating_sub(1);
        self
    }

    pub fn exponent_digit(self, digit: u32) -> Self {
        Self {
            exponent: self
                .exponent
                .saturating_mul(10)
                .saturating_add(digit as i32),
            ..self
        }
    }

    pub fn negate_exponent(self) -> Self {
        Self {
            negative_exponent: true,
            ..self
        }
    }

    /// Nearest f64 to the literal.
    pub fn value(&self) -> f64 {
        if self.digits.is_empty() {
            return 0.0;
        }
        let exponent = if self.negative_exponent {
            self.scale.saturating_sub(self.exponent)
        } else {
            self.scale.saturating_add(self.exponent)
        };

        let power = exponent.unsigned_abs() as usize;
        if let Ok(mantissa) = self.digits.parse::<u64>()
            && mantissa <= MAX_EXACT_MANTISSA
            && power < EXACT_POWERS.len()
        {
            let mantissa = mantissa as f64;
            return if exponent < 0 {
                mantissa / EXACT_POWERS[power]
            } else {
                mantissa * EXACT_POWERS[power]
            };
        }

        format!("{}e{}", self.digits, exponent)
            .parse()
            .unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(integer: &str, fraction: &str) -> Number {
        let number = integer
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(Number::default(), Number::integer_digit);
        fraction
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(number, Number::fraction_digit)
    }

    #[test]
    fn integers_and_fractions() {
        assert_eq!(digits("15", "").value(), 15.0);
        assert_eq!(digits("1234567", "9").value(), 1234567.9);
        assert_eq!(digits("0", "000").value(), 0.0);
    }

    #[test]
    fn exponents() {
        let number = digits("15", "").exponent_digit(1).exponent_digit(0);
        assert_eq!(number.value(), 150000000000.0);

        let number = digits("15", "67").negate_exponent().exponent_digit(3);
        assert_eq!(number.value(), 0.01567);

        let number = digits("1", "").exponent_digit(2).exponent_digit(3);
        assert_eq!(number.value(), 1e23);
    }

    #[test]
    fn long_mantissas_keep_their_magnitude() {
        let number = digits("123456789012345678900000000000", "");
        assert_eq!(number.value(), 123456789012345678900000000000.0);

        let number = digits("0", "1234567890123456789000000");
        assert_eq!(number.value(), 0.1234567890123456789);
    }

    #[test]
    fn digits_beyond_u64_still_round_correctly() {
        // 2^70 + 2^17 + 1: one above the midpoint of two neighbouring doubles.
        let number = digits("1180591620717411434497", "");
        assert_eq!(number.value(), 1180591620717411434497.0);
        assert_eq!(number.value(), 1.1805916207174116e21);

        let number = digits("0", "00000000001180591620717411434497");
        assert_eq!(number.value(), 1180591620717411434497e-32);
    }

    #[test]
    fn leading_zeros_only_move_the_scale() {
        assert_eq!(digits("000", "00012").value(), 0.00012);
        assert_eq!(digits("007", "").value(), 7.0);
    }

    #[test]
    fn huge_exponents_saturate() {
        let number = (0..15).fold(digits("1", ""), |n, _| n.exponent_digit(9));
        assert_eq!(number.value(), f64::INFINITY);
        assert_eq!(number.negate_exponent().value(), 0.0);
    }
}
