pub mod cap;
pub mod ccap;
pub mod congestion;
pub mod criticality;
pub mod gap_order;
pub mod left_edge;
pub mod packing;
mod pool;

use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::error::AssignError;
use chan_common::util::config::ChannelConfig;
use gap_order::GapOrder;

/// Result of an assignment run. Running out of a fixed gap budget is a
/// normal outcome, not an error.
#[derive(Debug, Clone)]
pub enum AssignOutcome {
    Routed(Vec<Gap>),
    Infeasible { gaps_used: usize, unassigned: usize },
}

impl AssignOutcome {
    pub fn gaps(&self) -> Option<&[Gap]> {
        match self {
            AssignOutcome::Routed(gaps) => Some(gaps),
            AssignOutcome::Infeasible { .. } => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, AssignOutcome::Routed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    LeftEdge,
    Cap,
    Ccap(GapOrder),
}

impl Algorithm {
    pub fn label(&self) -> String {
        match self {
            Algorithm::LeftEdge => "Left Edge".to_string(),
            Algorithm::Cap => "CAP".to_string(),
            Algorithm::Ccap(order) => format!("CCAP ({} gap order)", order),
        }
    }
}

/// Runs one algorithm. CCAP requires `n_gaps`; the others treat it as an
/// optional pre-allocated budget.
pub fn run(
    algorithm: Algorithm,
    nets: &NetList,
    config: &ChannelConfig,
    n_gaps: Option<usize>,
) -> Result<AssignOutcome, AssignError> {
    match algorithm {
        Algorithm::LeftEdge => left_edge::left_edge(nets, config, n_gaps).map(AssignOutcome::Routed),
        Algorithm::Cap => cap::cap(nets, config, n_gaps).map(AssignOutcome::Routed),
        Algorithm::Ccap(order) => {
            let n = n_gaps.ok_or(AssignError::MissingGapBudget("CCAP"))?;
            ccap::ccap(nets, config, n, order)
        }
    }
}

/// A net wider than a gap can never be placed; reject it up front.
pub(crate) fn validate_input(nets: &NetList, config: &ChannelConfig) -> Result<(), AssignError> {
    config.validate()?;
    if let Some(n) = nets.max_width() {
        if n.width() > config.gap_width {
            return Err(AssignError::NetTooWide {
                net: n.name.clone(),
                width: n.width(),
                gap_width: config.gap_width,
            });
        }
    }
    Ok(())
}
