//! The gene value trait.

/// A single gene value.
///
/// Built-in implementations exist for `bool`, `i64` and `f64`.
/// [`to_f64`](Gene::to_f64) projects a gene into gene space so that
/// distances and diversity can be computed independent of the encoding.
pub trait Gene: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the gene to `f64` for distance and statistics.
    fn to_f64(&self) -> f64;
}

impl Gene for bool {
    fn to_f64(&self) -> f64 {
        if *self {
            1.0
        } else {
            0.0
        }
    }
}

impl Gene for i64 {
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

impl Gene for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }
}
