use crate::db::core::NetList;
use crate::db::gap::Gap;
use crate::db::indices::NetId;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Verifies a finished assignment against its input net list.
pub fn run_assignment_check(input: &NetList, gaps: &[Gap]) -> Result<(), String> {
    log::info!("Starting Assignment Verification ({} gaps)...", gaps.len());

    let (conservation, capacity) = rayon::join(
        || check_conservation(input, gaps),
        || check_capacity(gaps),
    );

    let mut msgs = Vec::new();

    match conservation {
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: Net conservation violated");
            log::error!("{}", e);
            msgs.push(e);
        }
        Ok(_) => log::info!("\x1b[32mPASS\x1b[0m: Every net is assigned exactly once."),
    }

    match capacity {
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: Gap capacity exceeded");
            log::error!("{}", e);
            msgs.push(e);
        }
        Ok(_) => log::info!("\x1b[32mPASS\x1b[0m: No gap exceeds its track width."),
    }

    if msgs.is_empty() {
        Ok(())
    } else {
        Err(msgs.join("; "))
    }
}

fn check_conservation(input: &NetList, gaps: &[Gap]) -> Result<(), String> {
    let mut seen: HashMap<NetId, usize> = HashMap::new();
    for g in gaps {
        for a in g.assignments() {
            *seen.entry(a.net.id).or_insert(0) += 1;
        }
    }

    let mut errors = Vec::new();
    for n in input {
        match seen.remove(&n.id) {
            None => errors.push(format!("net '{}' is unassigned", n.name)),
            Some(1) => {}
            Some(k) => errors.push(format!("net '{}' is assigned {} times", n.name, k)),
        }
    }
    for id in seen.keys() {
        errors.push(format!("{} is not part of the input", id));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join(", "))
    }
}

fn check_capacity(gaps: &[Gap]) -> Result<(), String> {
    let valid = AtomicBool::new(true);

    gaps.par_iter().for_each(|gap| {
        for a in gap.assignments() {
            if a.max_height < a.net.width() || a.max_height > gap.width {
                log::error!(
                    "FAIL: Net '{}' in {} tops out at {} (width {}, gap width {})",
                    a.net.name,
                    gap.id,
                    a.max_height,
                    a.net.width(),
                    gap.width
                );
                valid.store(false, Ordering::Relaxed);
            }
        }

        // Density peaks only at endpoints.
        for a in gap.assignments() {
            for x in [a.net.minx(), a.net.maxx()] {
                let used: Decimal = gap
                    .assignments()
                    .iter()
                    .filter(|b| b.net.span().contains(x))
                    .map(|b| b.net.width())
                    .sum();
                if used > gap.width {
                    log::error!(
                        "FAIL: {} needs {} tracks at x={} but has {}",
                        gap.id,
                        used,
                        x,
                        gap.width
                    );
                    valid.store(false, Ordering::Relaxed);
                }
            }
        }
    });

    if valid.load(Ordering::Relaxed) {
        Ok(())
    } else {
        Err("Gap capacity verification failed.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::core::{Net, Pin};
    use rust_decimal_macros::dec;

    fn net(id: usize, minx: Decimal, maxx: Decimal) -> Net {
        let pins = vec![Pin::new(minx, dec!(0)), Pin::new(maxx, dec!(1))];
        Net::new(NetId::new(id), id.to_string(), pins, dec!(1)).unwrap()
    }

    #[test]
    fn accepts_a_valid_assignment() {
        let a = net(0, dec!(0), dec!(1));
        let b = net(1, dec!(2), dec!(3));
        let input: NetList = vec![a.clone(), b.clone()].into();
        let mut gap = Gap::at_slot(0, dec!(1), dec!(1));
        gap.assign(&a);
        gap.assign(&b);
        assert!(run_assignment_check(&input, &[gap]).is_ok());
    }

    #[test]
    fn reports_missing_and_duplicated_nets() {
        let a = net(0, dec!(0), dec!(1));
        let b = net(1, dec!(2), dec!(3));
        let input: NetList = vec![a.clone(), b].into();
        let mut g0 = Gap::at_slot(0, dec!(1), dec!(1));
        let mut g1 = Gap::at_slot(1, dec!(1), dec!(1));
        g0.assign(&a);
        g1.assign(&a);
        let err = run_assignment_check(&input, &[g0, g1]).unwrap_err();
        assert!(err.contains("unassigned"));
        assert!(err.contains("2 times"));
    }

    #[test]
    fn reports_overfull_gap() {
        let a = net(0, dec!(0), dec!(2));
        let b = net(1, dec!(1), dec!(3));
        let input: NetList = vec![a.clone(), b.clone()].into();
        // Width-1 gap forced to hold two overlapping nets.
        let mut gap = Gap::at_slot(0, dec!(1), dec!(1));
        gap.assign(&a);
        gap.assign(&b);
        assert!(run_assignment_check(&input, &[gap]).is_err());
    }
}
