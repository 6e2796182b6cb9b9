//! Wirelength bookkeeping for finished assignments.
//!
//! Everything here is derived from the gaps' assignment records; the
//! assignment algorithms never read these values back.

use crate::db::core::NetList;
use crate::db::gap::Gap;
use crate::util::config::ChannelConfig;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;

/// Sum of every net's vertical wirelength at the trunk height it was given.
pub fn realized_vertical_wirelength(gaps: &[Gap]) -> Decimal {
    gaps.iter()
        .flat_map(|g| {
            g.assignments()
                .iter()
                .map(move |a| a.net.vertical_wirelength(g.realized_midy(a)))
        })
        .sum()
}

/// Wire spent outside the nets' own pin spans; zero when every trunk lands
/// inside its net's span.
pub fn realized_detour(gaps: &[Gap]) -> Decimal {
    gaps.iter()
        .flat_map(|g| {
            g.assignments()
                .iter()
                .map(move |a| a.net.vertical_detour(g.realized_midy(a)))
        })
        .sum()
}

/// Height of a chip holding `n_gaps` gaps with an interval above the last one.
pub fn chip_height(n_gaps: usize, config: &ChannelConfig) -> Decimal {
    let n = Decimal::from(n_gaps as u64);
    (n + Decimal::ONE) * config.gap_interval + n * config.gap_width
}

/// Fewest gaps that could possibly hold the nets: `ceil(max_density / gap_width)`.
pub fn lower_bound_gaps(nets: &NetList, config: &ChannelConfig) -> usize {
    if config.gap_width <= Decimal::ZERO {
        return 0;
    }
    let bound = (nets.max_density() / config.gap_width).ceil();
    bound.to_usize().unwrap_or(0)
}

fn per_pin(vwl: Decimal, chip_height: Decimal, n_pins: usize) -> Decimal {
    let denom = chip_height * Decimal::from(n_pins as u64);
    vwl.checked_div(denom).unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone)]
pub struct InputReport {
    pub n_nets: usize,
    pub n_pins: usize,
    pub density: Decimal,
    pub lower_bound_gaps: usize,
    pub horizontal_wirelength: Decimal,
    pub vertical_wirelength: Decimal,
    pub chip_height: Decimal,
}

impl InputReport {
    pub fn new(nets: &NetList, config: &ChannelConfig, chip_height: Decimal) -> Self {
        Self {
            n_nets: nets.len(),
            n_pins: nets.n_pins(),
            density: nets.max_density(),
            lower_bound_gaps: lower_bound_gaps(nets, config),
            horizontal_wirelength: nets.horizontal_wirelength(),
            vertical_wirelength: nets.vertical_wirelength(),
            chip_height,
        }
    }

    pub fn vwl_per_pin(&self) -> Decimal {
        per_pin(self.vertical_wirelength, self.chip_height, self.n_pins)
    }
}

impl fmt::Display for InputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hwl_per_net = self
            .horizontal_wirelength
            .checked_div(Decimal::from(self.n_nets as u64))
            .unwrap_or(Decimal::ZERO);
        writeln!(f, "Input")?;
        writeln!(f, "  - #nets        : {}", self.n_nets)?;
        writeln!(f, "  - #pins        : {}", self.n_pins)?;
        writeln!(f, "  - Density      : {}", self.density)?;
        writeln!(f, "Lower Bound")?;
        writeln!(f, "  - #gaps used   : {}", self.lower_bound_gaps)?;
        writeln!(f, "  - horizontal wl: {:.1}", self.horizontal_wirelength)?;
        writeln!(f, "  - hwl/Ch/|N_in|: {:.2}", hwl_per_net)?;
        writeln!(f, "  - vertical   wl: {:.1}", self.vertical_wirelength)?;
        write!(f, "  - vwl/Cv/|P_in|: {:.4}", self.vwl_per_pin())
    }
}

/// Result line for one algorithm run. `gaps_used == None` marks an
/// infeasible run, which has no wirelength.
#[derive(Debug, Clone)]
pub struct AlgorithmReport {
    pub label: String,
    pub gaps_used: Option<usize>,
    pub vertical_wirelength: Decimal,
    pub detour: Decimal,
    pub vwl_per_pin: Decimal,
    pub rate_percent: Decimal,
}

impl AlgorithmReport {
    pub fn routed(label: impl Into<String>, gaps: &[Gap], input: &InputReport) -> Self {
        let vwl = realized_vertical_wirelength(gaps);
        let vwl_per_pin = per_pin(vwl, input.chip_height, input.n_pins);
        let rate_percent = (vwl_per_pin * Decimal::ONE_HUNDRED)
            .checked_div(input.vwl_per_pin())
            .unwrap_or(Decimal::ZERO);
        Self {
            label: label.into(),
            gaps_used: Some(gaps.len()),
            vertical_wirelength: vwl,
            detour: realized_detour(gaps),
            vwl_per_pin,
            rate_percent,
        }
    }

    pub fn infeasible(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            gaps_used: None,
            vertical_wirelength: Decimal::ZERO,
            detour: Decimal::ZERO,
            vwl_per_pin: Decimal::ZERO,
            rate_percent: Decimal::ZERO,
        }
    }
}

impl fmt::Display for AlgorithmReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        match self.gaps_used {
            None => write!(f, "  - infeasible with the given gap budget"),
            Some(n) => {
                writeln!(f, "  - #gaps used   : {}", n)?;
                writeln!(f, "  - vertical wl  : {:.1}", self.vertical_wirelength)?;
                writeln!(f, "  - detour       : {:.1}", self.detour)?;
                writeln!(f, "  - vwl/Cv/|P_in|: {:.4}", self.vwl_per_pin)?;
                write!(f, "  - rate[%]      : {:.1}", self.rate_percent)
            }
        }
    }
}
