use crate::packing::pack_left_edge;
use crate::pool::GapPool;
use crate::validate_input;
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::error::AssignError;
use chan_common::util::config::ChannelConfig;

/// Baseline left-edge assignment. Without a budget, gaps are opened one at a
/// time; with one, the least congested pre-allocated gap is filled next.
pub fn left_edge(
    nets: &NetList,
    config: &ChannelConfig,
    n_gaps: Option<usize>,
) -> Result<Vec<Gap>, AssignError> {
    validate_input(nets, config)?;

    let mut remaining = nets.clone();
    remaining.sort_by_key(|n| n.minx());

    log::info!(
        "Left Edge: {} nets, budget {:?}",
        remaining.len(),
        n_gaps
    );

    let mut pool = GapPool::new(config, n_gaps);
    let mut assigned = Vec::new();
    while !remaining.is_empty() {
        let mut gap = pool.next_gap(&remaining);
        let committed = pack_left_edge(&mut gap, &mut remaining);
        log::debug!(
            "Left Edge: {} took {} nets, {} left",
            gap.id,
            committed.len(),
            remaining.len()
        );
        assigned.push(gap);
    }

    log::info!("Left Edge: used {} gaps", assigned.len());
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
    fn disjoint_nets_share_one_gap() {
        let nets: NetList = vec![
            net(0, dec!(2), dec!(3), dec!(1)),
            net(1, dec!(0), dec!(1), dec!(1)),
        ]
        .into();
        let gaps = left_edge(&nets, &ChannelConfig::new(dec!(1), dec!(1)), None).unwrap();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].assignments().len(), 2);
    }

    #[test]
    fn identical_nets_open_a_second_gap() {
        let nets: NetList = vec![
            net(0, dec!(0), dec!(1), dec!(1)),
            net(1, dec!(0), dec!(1), dec!(1)),
        ]
        .into();
        let gaps = left_edge(&nets, &ChannelConfig::new(dec!(1), dec!(1)), Some(1)).unwrap();
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[1].base_height, dec!(3));
    }

    #[test]
    fn too_wide_net_is_rejected() {
        let nets: NetList = vec![net(0, dec!(0), dec!(1), dec!(3))].into();
        let err = left_edge(&nets, &ChannelConfig::new(dec!(2), dec!(1)), None).unwrap_err();
        assert!(matches!(err, AssignError::NetTooWide { .. }));
    }

    #[test]
    fn input_list_is_untouched() {
        let nets: NetList = vec![
            net(0, dec!(5), dec!(6), dec!(1)),
            net(1, dec!(0), dec!(1), dec!(1)),
        ]
        .into();
        let before = nets.clone();
        left_edge(&nets, &ChannelConfig::new(dec!(1), dec!(1)), None).unwrap();
        assert_eq!(nets, before);
    }
}
