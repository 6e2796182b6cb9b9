//! Left-edge packers that fill a single gap from an ordered net list.
//!
//! Both packers sweep the list keeping a frontier: a net is only taken if
//! its left edge lies strictly right of the previous pick's right edge.
//! Committed nets are removed from the working list before returning.

use chan_common::db::core::{Net, NetList};
use chan_common::db::gap::Gap;
use chan_common::db::indices::NetId;
use chan_common::geom::span::Span;
use rust_decimal::Decimal;

/// `None` is the frontier before any pick (minus infinity).
type Frontier = Option<Decimal>;

#[inline]
fn is_past(frontier: Frontier, x: Decimal) -> bool {
    frontier.is_none_or(|f| f < x)
}

/// Rejects a net if a max-density zone starts strictly between the frontier
/// and the net's left edge: taking it would skip over that zone in this pass.
pub(crate) fn clears_density_zones(frontier: Frontier, zones: &[Span], net: &Net) -> bool {
    !zones
        .iter()
        .any(|z| is_past(frontier, z.min) && z.min < net.minx())
}

/// Stack of gap-local height ceilings. The top is the tightest active one;
/// an empty stack means only the gap width applies.
#[derive(Debug, Default, Clone)]
pub struct CeilingStack(Vec<Decimal>);

impl CeilingStack {
    pub fn peek(&self) -> Option<Decimal> {
        self.0.last().copied()
    }

    pub fn pop(&mut self) -> Option<Decimal> {
        self.0.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Pushes the heights tallest first so the shortest becomes the new top.
    pub fn push_tiers(&mut self, mut heights: Vec<Decimal>) {
        heights.sort_by(|a, b| b.cmp(a));
        self.0.extend(heights);
    }
}

/// One sweep of the tiered packer: the ceiling it ran under and the nets it
/// committed, in pick order. Barren sweeps are recorded with no nets.
#[derive(Debug, Clone, PartialEq)]
pub struct PackRound {
    pub ceiling: Option<Decimal>,
    pub committed: Vec<NetId>,
}

/// Plain left-edge: repeat full sweeps until one commits nothing.
/// `nets` is expected sorted by left edge.
pub fn pack_left_edge(gap: &mut Gap, nets: &mut NetList) -> Vec<NetId> {
    let mut all = Vec::new();
    loop {
        let mut frontier: Frontier = None;
        let mut committed = Vec::new();
        for n in nets.iter() {
            if is_past(frontier, n.minx()) && gap.is_assignable(n, None) {
                gap.assign(n);
                frontier = Some(n.maxx());
                committed.push(n.id);
            }
        }

        if committed.is_empty() {
            break;
        }
        nets.remove_all(&committed);
        all.extend(committed);
    }
    all
}

/// Height-tiered left-edge. Each round rescans the list from the top after
/// every pick, gated by the density zones of the still-unassigned nets and by
/// the tightest ceiling. A productive round pushes the heights it reached as
/// new ceilings; a barren round pops one; a barren round with no ceiling
/// closes the gap.
pub fn pack_tiered(gap: &mut Gap, nets: &mut NetList) -> Vec<PackRound> {
    let mut ceilings = CeilingStack::default();
    let mut rounds = Vec::new();

    while !nets.is_empty() {
        let ceiling = ceilings.peek();
        let zones = nets.max_density_zones();
        let mut frontier: Frontier = None;
        let mut committed = Vec::new();

        while let Some(n) = nets.iter().find(|n| {
            is_past(frontier, n.minx())
                && clears_density_zones(frontier, &zones, n)
                && gap.is_assignable(n, ceiling)
        }) {
            gap.assign(n);
            frontier = Some(n.maxx());
            committed.push(n.id);
        }

        if committed.is_empty() {
            rounds.push(PackRound { ceiling, committed });
            if ceilings.pop().is_none() {
                break;
            }
            continue;
        }

        let heights = committed
            .iter()
            .filter_map(|&id| gap.assignment(id))
            .map(|a| a.max_height)
            .collect();
        ceilings.push_tiers(heights);

        log::trace!(
            "{}: round {} under ceiling {:?} committed {} nets ({} ceilings stacked)",
            gap.id,
            rounds.len(),
            ceiling,
            committed.len(),
            ceilings.len()
        );

        nets.remove_all(&committed);
        rounds.push(PackRound { ceiling, committed });
    }

    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chan_common::db::core::Pin;
    use rust_decimal_macros::dec;

    fn net(id: usize, minx: Decimal, maxx: Decimal, width: Decimal) -> Net {
        let pins = vec![Pin::new(minx, dec!(0)), Pin::new(maxx, dec!(1))];
        Net::new(NetId::new(id), id.to_string(), pins, width).unwrap()
    }

    fn ids(v: &[usize]) -> Vec<NetId> {
        v.iter().map(|&i| NetId::new(i)).collect()
    }

    #[test]
    fn ceiling_stack_pops_tightest_first() {
        let mut s = CeilingStack::default();
        s.push_tiers(vec![dec!(2), dec!(5), dec!(3)]);
        assert_eq!(s.peek(), Some(dec!(2)));
        assert_eq!(s.pop(), Some(dec!(2)));
        assert_eq!(s.pop(), Some(dec!(3)));
        assert_eq!(s.pop(), Some(dec!(5)));
        assert!(s.is_empty());
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn density_gate_is_strict_on_both_sides() {
        let zones = vec![Span::new(dec!(5), dec!(6))];
        let before = net(0, dec!(4), dec!(9), dec!(1));
        let at = net(1, dec!(5), dec!(9), dec!(1));
        let after = net(2, dec!(7), dec!(9), dec!(1));
        assert!(clears_density_zones(None, &zones, &before));
        assert!(clears_density_zones(None, &zones, &at));
        assert!(!clears_density_zones(None, &zones, &after));
        // A zone already behind the frontier no longer gates.
        assert!(clears_density_zones(Some(dec!(5)), &zones, &after));
    }

    #[test]
    fn left_edge_sweeps_until_nothing_fits() {
        let mut gap = Gap::at_slot(0, dec!(2), dec!(1));
        let mut nets: NetList = vec![
            net(0, dec!(0), dec!(2), dec!(1)),
            net(1, dec!(1), dec!(4), dec!(1)),
            net(2, dec!(3), dec!(5), dec!(1)),
            net(3, dec!(3), dec!(6), dec!(1)),
        ]
        .into();
        let committed = pack_left_edge(&mut gap, &mut nets);
        // Sweep 1: 0, 2. Sweep 2: 1 (on top of 0 and 2). Net 3 would need a third track.
        assert_eq!(committed, ids(&[0, 2, 1]));
        assert_eq!(nets.len(), 1);
        assert_eq!(gap.assignment(NetId::new(1)).map(|a| a.max_height), Some(dec!(2)));
    }

    #[test]
    fn tiered_rounds_respect_frontier_and_ceiling() {
        let mut gap = Gap::at_slot(0, dec!(4), dec!(1));
        let mut nets: NetList = vec![
            net(0, dec!(0), dec!(3), dec!(2)),
            net(1, dec!(4), dec!(6), dec!(1)),
            net(2, dec!(0), dec!(1), dec!(1)),
            net(3, dec!(2), dec!(5), dec!(1)),
        ]
        .into();
        let rounds = pack_tiered(&mut gap, &mut nets);
        assert!(nets.is_empty());

        for r in &rounds {
            let mut frontier: Frontier = None;
            for id in &r.committed {
                let a = gap.assignment(*id).unwrap();
                assert!(is_past(frontier, a.net.minx()));
                frontier = Some(a.net.maxx());
                if let Some(c) = r.ceiling {
                    assert!(a.max_height <= c);
                }
            }
        }
        // Round 0 stacks ceilings [2, 1]. Net 2 would land at 3 and net 3 is
        // held back by the zone starting at 0, so both ceilings are popped in
        // turn before the unconstrained round takes the rest.
        let trace: Vec<(Option<Decimal>, Vec<NetId>)> = rounds
            .iter()
            .map(|r| (r.ceiling, r.committed.clone()))
            .collect();
        assert_eq!(
            trace,
            vec![
                (None, ids(&[0, 1])),
                (Some(dec!(1)), ids(&[])),
                (Some(dec!(2)), ids(&[])),
                (None, ids(&[2, 3])),
            ]
        );
        assert_eq!(gap.assignment(NetId::new(2)).map(|a| a.max_height), Some(dec!(3)));
        assert_eq!(gap.assignment(NetId::new(3)).map(|a| a.max_height), Some(dec!(3)));
    }

    #[test]
    fn tiered_packer_closes_a_gap_that_cannot_take_anything() {
        let mut gap = Gap::at_slot(0, dec!(1), dec!(1));
        let a = net(0, dec!(0), dec!(1), dec!(1));
        gap.assign(&a);
        let mut nets: NetList = vec![net(1, dec!(0), dec!(1), dec!(1))].into();
        let rounds = pack_tiered(&mut gap, &mut nets);
        assert_eq!(
            rounds,
            vec![PackRound {
                ceiling: None,
                committed: Vec::new()
            }]
        );
        assert_eq!(nets.len(), 1);
    }
}
