use crate::congestion::calc_gap_congestion;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::util::config::ChannelConfig;

/// Supplies gaps to Left-Edge and CAP: either created one slot at a time, or
/// picked least-congested-first from a pre-allocated budget.
pub(crate) struct GapPool {
    config: ChannelConfig,
    budget: Option<usize>,
    pool: Vec<Gap>,
    next_slot: usize,
}

impl GapPool {
    pub fn new(config: &ChannelConfig, budget: Option<usize>) -> Self {
        let n = budget.unwrap_or(0);
        let pool = (0..n)
            .map(|i| Gap::at_slot(i, config.gap_width, config.gap_interval))
            .collect();
        Self {
            config: config.clone(),
            budget,
            pool,
            next_slot: n,
        }
    }

    pub fn next_gap(&mut self, remaining: &NetList) -> Gap {
        if self.budget.is_none() || self.pool.is_empty() {
            if let Some(n) = self.budget {
                log::warn!(
                    "Gap budget of {} exhausted with {} nets left; opening slot {}",
                    n,
                    remaining.len(),
                    self.next_slot
                );
            }
            let gap = Gap::at_slot(
                self.next_slot,
                self.config.gap_width,
                self.config.gap_interval,
            );
            self.next_slot += 1;
            return gap;
        }

        calc_gap_congestion(&mut self.pool, remaining.unit_width_nets());
        self.pool.sort_by_key(|g| g.congestion);
        let gap = self.pool.remove(0);
        log::debug!("Picked {} (congestion {})", gap.id, gap.congestion);
        gap
    }
}
