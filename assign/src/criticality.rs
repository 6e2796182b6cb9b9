use crate::congestion::two_closest;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::db::indices::NetId;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Per-round net priorities, kept apart from the nets themselves.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Priorities(HashMap<NetId, Decimal>);

impl Priorities {
    /// Missing nets have priority zero.
    pub fn get(&self, id: NetId) -> Decimal {
        self.0.get(&id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How much each net loses by not being routed in `target` now: the best
/// wirelength among its two closest remaining gaps minus its wirelength in
/// `target`. With no remaining gaps every priority is zero.
pub fn update_criticality_priority(nets: &NetList, gaps: &[Gap], target: &Gap) -> Priorities {
    let mut out = HashMap::with_capacity(nets.len());
    let target_midy = target.midy();

    for n in nets {
        let p = match two_closest(gaps, n) {
            None => Decimal::ZERO,
            Some((first, second)) => {
                let closest = n
                    .vertical_wirelength(gaps[first].midy())
                    .min(n.vertical_wirelength(gaps[second].midy()));
                closest - n.vertical_wirelength(target_midy)
            }
        };
        out.insert(n.id, p);
    }

    Priorities(out)
}
