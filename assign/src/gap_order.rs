use crate::congestion::calc_gap_congestion;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::error::AssignError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Which nets feed the congestion estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CongestionNets {
    UnitWidth,
    All,
}

/// Order in which CCAP visits its pre-allocated gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapOrder {
    /// Re-sorted by congestion before every pick.
    Congestion {
        most_congested_first: bool,
        nets: CongestionNets,
    },
    /// Shuffled once with a fixed seed.
    Random { seed: u64 },
    BottomUp,
    TopDown,
}

impl GapOrder {
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            GapOrder::Random { .. } => GapOrder::Random { seed },
            other => other,
        }
    }

    /// One-time ordering applied right after the gaps are allocated.
    pub fn initial_order(&self, gaps: &mut [Gap]) {
        match *self {
            GapOrder::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                gaps.shuffle(&mut rng);
            }
            GapOrder::BottomUp => gaps.sort_by_key(|g| g.base_height),
            GapOrder::TopDown => gaps.sort_by_key(|g| Reverse(g.base_height)),
            GapOrder::Congestion { .. } => {}
        }
    }

    /// Recomputes congestion over the remaining nets and re-sorts the gaps.
    /// Static orders leave the gaps untouched.
    pub fn reorder(&self, gaps: &mut [Gap], remaining: &NetList) {
        let GapOrder::Congestion {
            most_congested_first,
            nets,
        } = *self
        else {
            return;
        };

        match nets {
            CongestionNets::UnitWidth => calc_gap_congestion(gaps, remaining.unit_width_nets()),
            CongestionNets::All => calc_gap_congestion(gaps, remaining.iter()),
        }

        if most_congested_first {
            gaps.sort_by_key(|g| Reverse(g.congestion));
        } else {
            gaps.sort_by_key(|g| g.congestion);
        }
    }
}

impl FromStr for GapOrder {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let congestion = |most_congested_first, nets| GapOrder::Congestion {
            most_congested_first,
            nets,
        };
        match s {
            "cf-allnet" => Ok(congestion(true, CongestionNets::All)),
            "ca-allnet" => Ok(congestion(false, CongestionNets::All)),
            "cf-unitnet" => Ok(congestion(true, CongestionNets::UnitWidth)),
            "ca-unitnet" => Ok(congestion(false, CongestionNets::UnitWidth)),
            "random" => Ok(GapOrder::Random { seed: 0 }),
            "bottom-up" => Ok(GapOrder::BottomUp),
            "top-down" => Ok(GapOrder::TopDown),
            other => Err(AssignError::InvalidGapOrder(other.to_string())),
        }
    }
}

impl fmt::Display for GapOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapOrder::Congestion {
                most_congested_first,
                nets,
            } => {
                let dir = if *most_congested_first { "cf" } else { "ca" };
                let scope = match nets {
                    CongestionNets::UnitWidth => "unitnet",
                    CongestionNets::All => "allnet",
                };
                write!(f, "{}-{}", dir, scope)
            }
            GapOrder::Random { .. } => write!(f, "random"),
            GapOrder::BottomUp => write!(f, "bottom-up"),
            GapOrder::TopDown => write!(f, "top-down"),
        }
    }
}
