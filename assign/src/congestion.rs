//! Per-gap demand estimate used to order gap selection.
//!
//! Every scored net spreads one unit of credit evenly over the gaps it could
//! use without avoidable detour, so the gap totals always add up to the
//! number of nets scored.

use chan_common::db::core::Net;
use chan_common::db::gap::Gap;
use rust_decimal::Decimal;

/// Gap indices ordered by vertical distance from `y`; ties keep list order.
pub(crate) fn gaps_by_distance(gaps: &[Gap], y: Decimal) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..gaps.len()).collect();
    idx.sort_by_key(|&i| (gaps[i].midy() - y).abs());
    idx
}

/// The closest and second-closest gap to the net; both are the same gap when
/// only one exists. `None` for an empty list.
pub(crate) fn two_closest(gaps: &[Gap], net: &Net) -> Option<(usize, usize)> {
    let idx = gaps_by_distance(gaps, net.midy());
    let first = *idx.first()?;
    let second = idx.get(1).copied().unwrap_or(first);
    Some((first, second))
}

/// Gaps whose center lies inside the net's pin span.
fn optimal_gaps(net: &Net, gaps: &[Gap]) -> Vec<usize> {
    gaps.iter()
        .enumerate()
        .filter(|(_, g)| net.mid_bottom_y() <= g.midy() && g.midy() <= net.mid_upper_y())
        .map(|(i, _)| i)
        .collect()
}

/// Cheaper of the two closest gaps; ties go to the closer one.
fn best_gap(net: &Net, gaps: &[Gap]) -> Option<usize> {
    let (first, second) = two_closest(gaps, net)?;
    let first_wl = net.vertical_wirelength(gaps[first].midy());
    let second_wl = net.vertical_wirelength(gaps[second].midy());
    if first_wl <= second_wl {
        Some(first)
    } else {
        Some(second)
    }
}

/// Resets and recomputes `congestion` on every gap from the given nets.
pub fn calc_gap_congestion<'a>(gaps: &mut [Gap], nets: impl IntoIterator<Item = &'a Net>) {
    for g in gaps.iter_mut() {
        g.congestion = Decimal::ZERO;
    }
    if gaps.is_empty() {
        return;
    }

    for n in nets {
        let mut targets = optimal_gaps(n, gaps);
        if targets.is_empty() {
            targets.extend(best_gap(n, gaps));
        }

        let credit = Decimal::ONE / Decimal::from(targets.len() as u64);
        for i in targets {
            gaps[i].congestion += credit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chan_common::db::core::Pin;
    use chan_common::db::indices::NetId;
    use rust_decimal_macros::dec;

    // Gap centers at 15, 35, 55, 75 (width 10, interval 10).
    fn gaps(n: usize) -> Vec<Gap> {
        (0..n).map(|i| Gap::at_slot(i, dec!(10), dec!(10))).collect()
    }

    fn net(id: usize, ys: &[Decimal]) -> Net {
        let pins = ys
            .iter()
            .enumerate()
            .map(|(k, &y)| Pin::new(Decimal::from(k as u64), y))
            .collect();
        Net::new(NetId::new(id), id.to_string(), pins, dec!(1)).unwrap()
    }

    fn congestion(gaps: &[Gap]) -> Vec<Decimal> {
        gaps.iter().map(|g| g.congestion).collect()
    }

    #[test]
    fn credit_is_split_across_optimal_gaps() {
        let mut g = gaps(4);
        let nets = vec![net(0, &[dec!(10), dec!(40)]), net(1, &[dec!(50), dec!(80)])];
        calc_gap_congestion(&mut g, &nets);
        assert_eq!(
            congestion(&g),
            vec![dec!(0.5), dec!(0.5), dec!(0.5), dec!(0.5)]
        );
    }

    #[test]
    fn falls_back_to_cheapest_nearby_gap() {
        let mut g = gaps(4);
        // Span [20, 30] holds no center; 15 and 35 are equally near and
        // equally cheap, so the closer-in-list-order one wins.
        let nets = vec![net(0, &[dec!(20), dec!(30)])];
        calc_gap_congestion(&mut g, &nets);
        assert_eq!(congestion(&g), vec![dec!(1), dec!(0), dec!(0), dec!(0)]);

        // Span [36, 40]: 35 costs 5, 55 costs 19.
        let nets = vec![net(1, &[dec!(36), dec!(40), dec!(38)])];
        calc_gap_congestion(&mut g, &nets);
        assert_eq!(congestion(&g), vec![dec!(0), dec!(1), dec!(0), dec!(0)]);
    }

    #[test]
    fn multi_pin_net_credits_every_gap_inside_its_span() {
        // Centers 1.5, 3.5, 5.5, 7.5, 9.5; pins span [0, 10] around a tight
        // cluster at 0..2.
        let mut g: Vec<Gap> = (0..5).map(|i| Gap::at_slot(i, dec!(1), dec!(1))).collect();
        let nets = vec![net(0, &[dec!(0), dec!(1), dec!(2), dec!(10)])];
        calc_gap_congestion(&mut g, &nets);
        assert_eq!(congestion(&g), vec![dec!(0.2); 5]);
    }

    #[test]
    fn single_gap_takes_all_credit() {
        let mut g = gaps(1);
        let nets = vec![net(0, &[dec!(70), dec!(90)]), net(1, &[dec!(0), dec!(1)])];
        calc_gap_congestion(&mut g, &nets);
        assert_eq!(congestion(&g), vec![dec!(2)]);
    }

    #[test]
    fn recomputation_resets_previous_scores() {
        let mut g = gaps(2);
        g[1].congestion = dec!(9);
        calc_gap_congestion(&mut g, &Vec::<Net>::new());
        assert_eq!(congestion(&g), vec![dec!(0), dec!(0)]);
    }

    #[test]
    fn total_credit_equals_nets_scored() {
        let mut g = gaps(4);
        let nets: Vec<Net> = (0..12)
            .map(|i| {
                let lo = Decimal::from(i * 7 % 90);
                net(i as usize, &[lo, lo + Decimal::from(i * 3 % 60), dec!(45)])
            })
            .collect();
        calc_gap_congestion(&mut g, &nets);
        let total: Decimal = g.iter().map(|g| g.congestion).sum();
        // Thirds are not exact in decimal; allow the last-digit rounding.
        assert!((total - dec!(12)).abs() < dec!(0.000000000000000000001));
    }
}
