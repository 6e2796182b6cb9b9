use crate::db::core::{Net, NetList, Pin};
use crate::db::indices::NetId;
use crate::error::AssignError;
use crate::util::config::GeneratorConfig;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

const TRACK_WIDTHS: [u32; 4] = [1, 2, 3, 4];
const COORD_DECIMALS: u32 = 12;

fn width_weights(scenario: u32) -> Result<[f64; 4], AssignError> {
    match scenario {
        // normal case
        1 => Ok([0.80, 0.10, 0.08, 0.02]),
        // wide-net heavy
        2 => Ok([0.50, 0.30, 0.15, 0.05]),
        other => Err(AssignError::UnknownScenario(other)),
    }
}

fn to_decimal(v: f64) -> Result<Decimal, AssignError> {
    Decimal::from_f64(v)
        .map(|d| d.round_dp(COORD_DECIMALS))
        .ok_or(AssignError::GeneratorRange(v))
}

/// Random net list: x in [0, 1), y in [0, 1) or in [0, chip_height) when
/// given. The same seed always yields the same nets.
pub fn generate_netlist(
    config: &GeneratorConfig,
    chip_height: Option<Decimal>,
) -> Result<NetList, AssignError> {
    if config.max_n_pins < 2 {
        return Err(AssignError::InvalidNet {
            name: "<generator>".to_string(),
            reason: format!("max_n_pins must be at least 2, got {}", config.max_n_pins),
        });
    }
    let weights = width_weights(config.scenario)?;
    let width_dist =
        WeightedIndex::new(weights).map_err(|_| AssignError::UnknownScenario(config.scenario))?;

    let y_max = match chip_height {
        Some(h) => {
            let h = h.to_f64().unwrap_or(0.0);
            if h <= 0.0 {
                return Err(AssignError::GeneratorRange(h));
            }
            h
        }
        None => 1.0,
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.n_nets;
    let k = config.max_n_pins;

    let xs: Vec<f64> = (0..n * k).map(|_| rng.r#gen::<f64>()).collect();
    let ys: Vec<f64> = (0..n * k).map(|_| rng.gen_range(0.0..y_max)).collect();
    let widths: Vec<u32> = (0..n)
        .map(|_| TRACK_WIDTHS[width_dist.sample(&mut rng)])
        .collect();

    let mut netlist = NetList::new();
    for (i, &width) in widths.iter().enumerate() {
        let n_pins = rng.gen_range(2..=k);
        let row = i * k;
        let pins = (0..n_pins)
            .map(|j| -> Result<Pin, AssignError> {
                Ok(Pin::new(to_decimal(xs[row + j])?, to_decimal(ys[row + j])?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        netlist.push(Net::new(
            NetId::new(i),
            i.to_string(),
            pins,
            Decimal::from(width),
        )?);
    }

    log::debug!(
        "Generated {} nets ({} pins, max density {})",
        netlist.len(),
        netlist.n_pins(),
        netlist.max_density()
    );
    Ok(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            n_nets: 40,
            max_n_pins: 5,
            scenario: 2,
        }
    }

    #[test]
    fn same_seed_same_nets() {
        let a = generate_netlist(&config(3), None).unwrap();
        let b = generate_netlist(&config(3), None).unwrap();
        let c = generate_netlist(&config(4), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn respects_chip_height_pin_counts_and_widths() {
        let nets = generate_netlist(&config(1), Some(dec!(50))).unwrap();
        assert_eq!(nets.len(), 40);
        for n in &nets {
            assert!((2..=5).contains(&n.pins().len()));
            assert!(n.width() >= dec!(1) && n.width() <= dec!(4));
            for p in n.pins() {
                assert!(p.x >= dec!(0) && p.x <= dec!(1));
                assert!(p.y >= dec!(0) && p.y <= dec!(50));
            }
        }
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        let mut cfg = config(0);
        cfg.scenario = 9;
        assert_eq!(
            generate_netlist(&cfg, None).unwrap_err(),
            AssignError::UnknownScenario(9)
        );
    }
}
