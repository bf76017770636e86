use super::{Difference, DifferenceKind, Path};
use crate::Scalar;

/// Compares two scalars: type tag first, then value.
pub(super) fn compare_scalars(
    actual: &Scalar,
    expected: &Scalar,
    path: &Path,
) -> Option<Difference> {
    if actual.kind() != expected.kind() {
        return Some(Difference::new(DifferenceKind::OtherType, path.clone()));
    }
    if actual != expected {
        return Some(Difference::new(DifferenceKind::OtherValue, path.clone()));
    }
    None
}
