use crate::db::core::Net;
use crate::db::indices::{GapId, NetId};
use rust_decimal::Decimal;

/// A net committed to a gap. `max_height` is the gap-local top track of the
/// net's trunk, so the net occupies `(max_height - width, max_height]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub net: Net,
    pub max_height: Decimal,
}

/// A horizontal routing channel of `width` tracks whose bottom sits at
/// `base_height`.
#[derive(Clone, Debug)]
pub struct Gap {
    pub id: GapId,
    pub width: Decimal,
    pub base_height: Decimal,
    /// Scratch value written by the congestion scorer.
    pub congestion: Decimal,
    assignments: Vec<Assignment>,
}

impl Gap {
    pub fn new(id: GapId, width: Decimal, base_height: Decimal) -> Self {
        Self {
            id,
            width,
            base_height,
            congestion: Decimal::ZERO,
            assignments: Vec::new(),
        }
    }

    /// Gap in vertical slot `index`, stacked above `index` earlier gaps with
    /// `interval` of spacing below each of them.
    pub fn at_slot(index: usize, width: Decimal, interval: Decimal) -> Self {
        let i = Decimal::from(index as u64);
        let base_height = (i + Decimal::ONE) * interval + i * width;
        Self::new(GapId::new(index), width, base_height)
    }

    pub fn midy(&self) -> Decimal {
        self.base_height + self.width / Decimal::TWO
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assignment(&self, net: NetId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.net.id == net)
    }

    /// Top track the net would reach if placed now: it rests on the highest
    /// already-placed net it overlaps horizontally.
    pub fn landing_height(&self, net: &Net) -> Decimal {
        let span = net.span();
        let floor = self
            .assignments
            .iter()
            .filter(|a| a.net.span().overlaps(&span))
            .map(|a| a.max_height)
            .max()
            .unwrap_or(Decimal::ZERO);
        floor + net.width()
    }

    /// Whether the net fits under the gap width and under `ceiling`, if any.
    pub fn is_assignable(&self, net: &Net, ceiling: Option<Decimal>) -> bool {
        let top = self.landing_height(net);
        let limit = match ceiling {
            Some(c) => c.min(self.width),
            None => self.width,
        };
        top <= limit
    }

    /// Commits the net and returns its `max_height`. Callers check
    /// `is_assignable` first.
    pub fn assign(&mut self, net: &Net) -> Decimal {
        let max_height = self.landing_height(net);
        self.assignments.push(Assignment {
            net: net.clone(),
            max_height,
        });
        max_height
    }

    /// Trunk height at which the assigned net is actually routed.
    pub fn realized_midy(&self, assignment: &Assignment) -> Decimal {
        self.base_height + assignment.max_height - assignment.net.width() / Decimal::TWO
    }
}
