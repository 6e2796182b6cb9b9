use crate::AssignOutcome;
use crate::criticality::update_criticality_priority;
use crate::gap_order::GapOrder;
use crate::packing::pack_tiered;
use crate::validate_input;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::error::AssignError;
use chan_common::util::config::ChannelConfig;
use std::cmp::Reverse;

/// Criticality- and congestion-aware priority assignment over exactly
/// `n_gaps` pre-allocated gaps.
///
/// Each step picks the next gap from `order` (congestion orders are
/// re-evaluated while more than one gap remains), re-ranks the remaining
/// nets by width, then by how much they lose if not routed in that gap, then
/// by left edge, and fills the gap with the tiered packer. Running out of
/// gaps with nets left yields [`AssignOutcome::Infeasible`].
pub fn ccap(
    nets: &NetList,
    config: &ChannelConfig,
    n_gaps: usize,
    order: GapOrder,
) -> Result<AssignOutcome, AssignError> {
    validate_input(nets, config)?;

    let mut remaining = nets.clone();
    let mut gaps: Vec<Gap> = (0..n_gaps)
        .map(|i| Gap::at_slot(i, config.gap_width, config.gap_interval))
        .collect();
    order.initial_order(&mut gaps);

    log::info!(
        "CCAP: {} nets into {} gaps ({} gap order)",
        remaining.len(),
        n_gaps,
        order
    );

    let mut assigned = Vec::new();
    while !remaining.is_empty() {
        if gaps.is_empty() {
            log::warn!(
                "CCAP: all {} gaps used with {} nets unassigned",
                assigned.len(),
                remaining.len()
            );
            return Ok(AssignOutcome::Infeasible {
                gaps_used: assigned.len(),
                unassigned: remaining.len(),
            });
        }

        if gaps.len() > 1 {
            order.reorder(&mut gaps, &remaining);
        }

        let mut target = gaps.remove(0);
        let priorities = update_criticality_priority(&remaining, &gaps, &target);
        remaining.sort_by_key(|n| (Reverse(n.width()), Reverse(priorities.get(n.id)), n.minx()));

        let rounds = pack_tiered(&mut target, &mut remaining);
        log::debug!(
            "CCAP: {} (congestion {}) filled in {} rounds, {} nets left",
            target.id,
            target.congestion,
            rounds.len(),
            remaining.len()
        );
        assigned.push(target);
    }

    log::info!("CCAP: used {} gaps", assigned.len());
    Ok(AssignOutcome::Routed(assigned))
}
