use polcla_protocol::{Polarity, PolarityCategory, ShifterKind};

/// Offset applied when a shifter flips an expression.
pub const SHIFT_AMOUNT: f64 = 1.3;

/// Result of shifting one expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shifted {
    /// New class and magnitude.
    pub after: Polarity,
    /// Signed amount added to the sentence sum.
    pub contribution: f64,
}

/// Flips the class of a POS or NEG expression and moves its value by
/// [`SHIFT_AMOUNT`]. Other classes pass through unshifted.
pub fn shift(kind: ShifterKind, before: Polarity) -> Shifted {
    if !before.category.is_polar() {
        return Shifted {
            after: before,
            contribution: before.signed(),
        };
    }

    let value = before.value;
    let (category, signed) = match (kind, before.category) {
        (ShifterKind::OnNegative, _) => (PolarityCategory::Pos, -value + SHIFT_AMOUNT),
        (ShifterKind::OnPositive, _) => (PolarityCategory::Neg, value - SHIFT_AMOUNT),
        (ShifterKind::General, PolarityCategory::Pos) => (PolarityCategory::Neg, value - SHIFT_AMOUNT),
        (ShifterKind::General, _) => (PolarityCategory::Pos, -value + SHIFT_AMOUNT),
    };

    Shifted {
        after: Polarity::new(category, signed.abs()),
        contribution: signed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_general_on_negative_value() {
        let shifted = shift(ShifterKind::General, Polarity::new(PolarityCategory::Neg, 0.7));

        assert_eq!(shifted.after.category, PolarityCategory::Pos);
        assert!((shifted.after.value - 0.6).abs() < EPS);
        assert!((shifted.contribution - 0.6).abs() < EPS);
    }

    #[test]
    fn test_on_positive() {
        let shifted = shift(ShifterKind::OnPositive, Polarity::new(PolarityCategory::Pos, 1.0));

        assert_eq!(shifted.after.category, PolarityCategory::Neg);
        assert!((shifted.contribution + 0.3).abs() < EPS);
        assert!((shifted.after.value - 0.3).abs() < EPS);
    }

    #[test]
    fn test_neutral_unchanged() {
        let before = Polarity::new(PolarityCategory::Neu, 0.0);
        let shifted = shift(ShifterKind::General, before);

        assert_eq!(shifted.after, before);
        assert_eq!(shifted.contribution, 0.0);
    }

    proptest! {
        #[test]
        fn test_general_round_trip(value in 0.0f64..1.0) {
            let first = shift(ShifterKind::General, Polarity::new(PolarityCategory::Pos, value));
            prop_assert_eq!(first.after.category, PolarityCategory::Neg);
            prop_assert!((first.contribution - (value - SHIFT_AMOUNT)).abs() < EPS);

            // the NEG result, taken as a lexicon value, shifts back to `value`
            let second = shift(
                ShifterKind::General,
                Polarity::new(PolarityCategory::Neg, -first.contribution),
            );
            prop_assert_eq!(second.after.category, PolarityCategory::Pos);
            prop_assert!((second.contribution - value).abs() < EPS);
        }
    }
}
