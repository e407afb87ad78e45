use polcla_protocol::{PolarityCategory, ShifterKind};

/// Can a shifter of `kind` apply to an expression of `category`?
///
/// General shifters apply to anything. On-positive shifters need a POS
/// expression, on-negative ones a NEG expression. A candidate without a
/// known class always passes.
pub fn orientation_check(kind: ShifterKind, category: Option<PolarityCategory>) -> bool {
    let Some(category) = category else {
        return true;
    };
    match kind {
        ShifterKind::General => true,
        ShifterKind::OnPositive => category == PolarityCategory::Pos,
        ShifterKind::OnNegative => category == PolarityCategory::Neg,
    }
}
