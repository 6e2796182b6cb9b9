use rust_decimal::Decimal;

/// Closed horizontal interval `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub min: Decimal,
    pub max: Decimal,
}

impl Span {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> Decimal {
        self.max - self.min
    }

    /// Closed-interval overlap: spans touching at a single x overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn contains(&self, x: Decimal) -> bool {
        x >= self.min && x <= self.max
    }
}
