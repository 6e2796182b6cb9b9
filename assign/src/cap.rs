use crate::packing::pack_tiered;
use crate::pool::GapPool;
use crate::validate_input;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::error::AssignError;
use chan_common::util::config::ChannelConfig;
use std::cmp::Reverse;

/// Congestion-aware priority assignment: nets ordered widest first, then by
/// left edge, for the whole run; each gap is filled with the tiered packer.
pub fn cap(
    nets: &NetList,
    config: &ChannelConfig,
    n_gaps: Option<usize>,
) -> Result<Vec<Gap>, AssignError> {
    validate_input(nets, config)?;

    let mut remaining = nets.clone();
    remaining.sort_by_key(|n| (Reverse(n.width()), n.minx()));

    log::info!("CAP: {} nets, budget {:?}", remaining.len(), n_gaps);

    let mut pool = GapPool::new(config, n_gaps);
    let mut assigned = Vec::new();
    while !remaining.is_empty() {
        let mut gap = pool.next_gap(&remaining);
        let rounds = pack_tiered(&mut gap, &mut remaining);
        log::debug!(
            "CAP: {} filled in {} rounds, {} nets left",
            gap.id,
            rounds.len(),
            remaining.len()
        );
        assigned.push(gap);
    }

    log::info!("CAP: used {} gaps", assigned.len());
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chan_common::db::core::{Net, Pin};
    use chan_common::db::indices::NetId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn net(id: usize, minx: Decimal, maxx: Decimal, width: Decimal) -> Net {
        let pins = vec![Pin::new(minx, dec!(0)), Pin::new(maxx, dec!(3))];
        Net::new(NetId::new(id), id.to_string(), pins, width).unwrap()
    }

    #[test]
    fn wide_nets_land_first_at_the_bottom() {
        let nets: NetList = vec![
            net(0, dec!(0), dec!(4), dec!(1)),
            net(1, dec!(1), dec!(3), dec!(2)),
        ]
        .into();
        let gaps = cap(&nets, &ChannelConfig::new(dec!(3), dec!(1)), None).unwrap();
        assert_eq!(gaps.len(), 1);
        let wide = gaps[0].assignment(NetId::new(1)).unwrap();
        let narrow = gaps[0].assignment(NetId::new(0)).unwrap();
        assert_eq!(wide.max_height, dec!(2));
        assert_eq!(narrow.max_height, dec!(3));
    }

    #[test]
    fn overlapping_unit_nets_need_two_gaps() {
        let nets: NetList = vec![
            net(0, dec!(0), dec!(1), dec!(1)),
            net(1, dec!(0), dec!(1), dec!(1)),
        ]
        .into();
        let gaps = cap(&nets, &ChannelConfig::new(dec!(1), dec!(1)), None).unwrap();
        assert_eq!(gaps.len(), 2);
    }
}
