use netcalc_abstract::{Completion, MultiplexingParams, Schedule, Sender};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

use crate::error::{Error, Result, finite, non_negative, positive};
use crate::units::bytes_to_bits;

#[derive(Debug)]
struct Queued {
    packets_needed: u64,
    turn_order: usize,
}

// Custom Ord for Min-Heap (fewest packets pops first, then earliest turn)
impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.packets_needed == other.packets_needed && self.turn_order == other.turn_order
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .packets_needed
            .cmp(&self.packets_needed)
            .then_with(|| other.turn_order.cmp(&self.turn_order))
    }
}

/// Packets needed to carry `size_bytes`, padding the last one to a full payload.
pub fn packets_needed(size_bytes: f64, payload_bytes: f64) -> Result<u64> {
    let packets = (size_bytes / payload_bytes).ceil();
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it cannot be cast.
    if !packets.is_finite() || packets >= u64::MAX as f64 {
        return Err(Error::Overflow {
            field: "packets_needed",
        });
    }
    Ok(packets as u64)
}

/// Compute when each sender's file finishes crossing a link shared
/// round-robin, one packet per sender per turn.
///
/// Processing and queuing delays are ignored. The returned schedule lists
/// senders in the order they finish: by packets needed, then by turn order.
pub fn schedule(
    link_rate_bps: f64,
    sender_count: usize,
    start_time_seconds: f64,
    file_sizes_bytes: &[f64],
    payload_bytes: f64,
    header_bytes: f64,
) -> Result<Schedule> {
    if sender_count == 0 {
        return Err(Error::NotPositive {
            field: "sender_count",
            value: 0.0,
        });
    }
    if sender_count != file_sizes_bytes.len() {
        return Err(Error::CountMismatch {
            what: "sender_count vs file sizes",
            declared: sender_count as u64,
            actual: file_sizes_bytes.len() as u64,
        });
    }
    let link_rate_bps = positive("link_rate_bps", link_rate_bps)?;
    let start_time_seconds = finite("start_time_seconds", start_time_seconds)?;
    let payload_bytes = positive("payload_bytes", payload_bytes)?;
    let header_bytes = non_negative("header_bytes", header_bytes)?;

    let senders = file_sizes_bytes
        .iter()
        .enumerate()
        .map(|(turn_order, &size_bytes)| {
            positive("file_size_bytes", size_bytes)?;
            Ok(Sender {
                size_bytes,
                turn_order,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let packet_bits = bytes_to_bits(payload_bytes + header_bytes);

    let mut queue = senders
        .iter()
        .map(|s| {
            Ok(Queued {
                packets_needed: packets_needed(s.size_bytes, payload_bytes)?,
                turn_order: s.turn_order,
            })
        })
        .collect::<Result<BinaryHeap<_>>>()?;

    let mut completions = Vec::with_capacity(sender_count);
    let mut packets_on_link: u64 = 0;
    let mut previous_needed: u64 = 0;
    let mut active = sender_count as u64;

    while let Some(next) = queue.pop() {
        // Every still-active sender sends the same extra packets as this one.
        packets_on_link = (next.packets_needed - previous_needed)
            .checked_mul(active)
            .and_then(|extra| packets_on_link.checked_add(extra))
            .ok_or(Error::Overflow {
                field: "packets_on_link",
            })?;
        previous_needed = next.packets_needed;
        active -= 1;

        let finish_time_seconds =
            packets_on_link as f64 * packet_bits / link_rate_bps + start_time_seconds;
        debug!(
            "sender {} done after {} packets on link ({} of its own) at {}s",
            next.turn_order, packets_on_link, next.packets_needed, finish_time_seconds
        );
        completions.push(Completion {
            finish_time_seconds,
            turn_order: next.turn_order,
        });
    }

    Ok(Schedule::new(completions))
}

pub fn schedule_params(params: &MultiplexingParams) -> Result<Schedule> {
    schedule(
        params.link_rate_bps,
        params.sender_count,
        params.start_time_seconds,
        &params.file_sizes_bytes,
        params.payload_bytes,
        params.header_bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{kibs_to_bytes, mbps_to_bps, mibs_to_bytes};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn two_senders_share_link() {
        let sched = schedule(
            mbps_to_bps(37.6),
            2,
            0.0,
            &[mibs_to_bytes(11.0), kibs_to_bytes(36.0)],
            1000.0,
            24.0,
        )
        .unwrap();
        let c = sched.completions();
        assert_eq!(c.len(), 2);
        // 37 packets each, then 11535 - 37 alone.
        assert_eq!(c[0].turn_order, 1);
        assert!(approx(c[0].finish_time_seconds, 74.0 * 8192.0 / 37.6e6));
        assert_eq!(c[1].turn_order, 0);
        assert!(approx(c[1].finish_time_seconds, (74.0 + 11498.0) * 8192.0 / 37.6e6));
    }

    #[test]
    fn three_senders_use_remaining_share() {
        // 6, 1 and 3 packets of 125 bytes over 1000 bps, one second each.
        let sched = schedule(1000.0, 3, 2.0, &[600.0, 100.0, 300.0], 100.0, 25.0).unwrap();
        let c = sched.completions();
        assert_eq!(
            c.iter().map(|c| c.turn_order).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
        assert!(approx(c[0].finish_time_seconds, 2.0 + 3.0));
        assert!(approx(c[1].finish_time_seconds, 2.0 + 3.0 + 4.0));
        assert!(approx(c[2].finish_time_seconds, 2.0 + 3.0 + 4.0 + 3.0));
    }

    #[test]
    fn ties_break_on_turn_order() {
        let sched = schedule(8000.0, 3, 0.0, &[950.0, 1000.0, 901.0], 100.0, 0.0).unwrap();
        let c = sched.completions();
        assert_eq!(
            c.iter().map(|c| c.turn_order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(c[0].finish_time_seconds <= c[1].finish_time_seconds);
        assert!(c[1].finish_time_seconds <= c[2].finish_time_seconds);
    }

    #[test]
    fn finish_times_non_decreasing_and_turns_complete() {
        let sizes = [5_000.0, 120.0, 77_777.0, 5_000.0, 1.0, 40_960.0, 999.0];
        let sched = schedule(1.0e6, sizes.len(), 0.5, &sizes, 512.0, 40.0).unwrap();
        assert_eq!(sched.completions().len(), sizes.len());
        assert!(
            sched
                .completions()
                .windows(2)
                .all(|w| w[0].finish_time_seconds <= w[1].finish_time_seconds)
        );
        let turns: Vec<usize> = sched.by_turn_order().iter().map(|c| c.turn_order).collect();
        assert_eq!(turns, (0..sizes.len()).collect::<Vec<_>>());
    }

    #[test]
    fn mismatched_sender_count_is_rejected() {
        let err = schedule(1.0e6, 3, 0.0, &[10.0, 20.0], 10.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            Error::CountMismatch {
                what: "sender_count vs file sizes",
                declared: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn huge_files_overflow_instead_of_wrapping() {
        assert_eq!(
            schedule(1.0e9, 2, 0.0, &[9.3e18, 9.3e18], 1.0, 0.0),
            Err(Error::Overflow {
                field: "packets_on_link"
            })
        );
        assert_eq!(
            schedule(1.0e9, 2, 0.0, &[1.0e300, 1.0e300], 1.0, 0.0),
            Err(Error::Overflow {
                field: "packets_needed"
            })
        );
        assert!(packets_needed(1.0e6, 1.0e-300).is_err());
        assert_eq!(packets_needed(2500.0, 1000.0), Ok(3));
    }

    #[test]
    fn zero_rate_and_payload_are_rejected() {
        assert!(schedule(0.0, 1, 0.0, &[10.0], 10.0, 1.0).is_err());
        assert!(schedule(1.0e6, 1, 0.0, &[10.0], 0.0, 1.0).is_err());
        assert!(schedule(1.0e6, 0, 0.0, &[], 10.0, 1.0).is_err());
        assert!(schedule(1.0e6, 1, 0.0, &[-4.0], 10.0, 1.0).is_err());
    }
}
