use netcalc_abstract::{Round, SlowStartParams};
use tracing::debug;

use crate::error::{Result, nonzero};

/// Simulate TCP congestion-window growth over `packet_count` packets.
///
/// The window starts at one MSS and doubles every round until it reaches
/// `window_limit_bytes`, after which it grows by one MSS per round. Each
/// round carries as many packets as fit in the window, and always at least
/// one so the simulation makes progress when a packet is larger than the
/// window.
pub fn simulate(
    mss_bytes: u64,
    window_limit_bytes: u64,
    packet_count: u64,
    packet_size_bytes: Option<u64>,
) -> Result<Vec<Round>> {
    let mss_bytes = nonzero("mss_bytes", mss_bytes)?;
    let window_limit_bytes = nonzero("window_limit_bytes", window_limit_bytes)?;
    let packet_size = nonzero("packet_size_bytes", packet_size_bytes.unwrap_or(mss_bytes))?;

    let mut rounds = Vec::new();
    let mut window_mss: u64 = 1;
    let mut window_bytes = mss_bytes;
    let mut next_packet: u64 = 1;

    while next_packet <= packet_count {
        let mut packet_numbers = Vec::new();
        let mut used: u64 = 0;
        while next_packet <= packet_count && used.saturating_add(packet_size) <= window_bytes {
            packet_numbers.push(next_packet);
            used += packet_size;
            next_packet += 1;
        }
        if packet_numbers.is_empty() {
            packet_numbers.push(next_packet);
            next_packet += 1;
        }

        let round = Round {
            group_number: rounds.len() as u64 + 1,
            congestion_window_mss: window_mss,
            congestion_window_bytes: window_bytes,
            packet_numbers,
        };
        debug!(
            "round {}: cwnd={} MSS ({} bytes), {} packets",
            round.group_number,
            round.congestion_window_mss,
            round.congestion_window_bytes,
            round.packet_numbers.len()
        );
        rounds.push(round);

        window_mss = if window_bytes >= window_limit_bytes {
            window_mss.saturating_add(1)
        } else {
            window_mss.saturating_mul(2)
        };
        window_bytes = mss_bytes.saturating_mul(window_mss);
    }

    Ok(rounds)
}

pub fn simulate_params(params: &SlowStartParams) -> Result<Vec<Round>> {
    simulate(
        params.mss_bytes,
        params.window_limit_bytes,
        params.packet_count,
        params.packet_size_bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn windows(rounds: &[Round]) -> Vec<u64> {
        rounds.iter().map(|r| r.congestion_window_mss).collect()
    }

    #[test]
    fn doubles_until_limit() {
        let rounds = simulate(1460, 11680, 15, None).unwrap();
        assert_eq!(windows(&rounds), vec![1, 2, 4, 8]);
        assert_eq!(rounds[0].packet_numbers, vec![1]);
        assert_eq!(rounds[1].packet_numbers, vec![2, 3]);
        assert_eq!(rounds[2].packet_numbers, vec![4, 5, 6, 7]);
        assert_eq!(rounds[3].packet_numbers, (8..=15).collect::<Vec<_>>());
        assert_eq!(rounds[3].congestion_window_bytes, 11680);
        let total: usize = rounds.iter().map(|r| r.packet_numbers.len()).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn grows_linearly_at_limit() {
        let rounds = simulate(1460, 11680, 40, None).unwrap();
        assert_eq!(windows(&rounds), vec![1, 2, 4, 8, 9, 10, 11]);
        assert_eq!(rounds[4].packet_numbers.len(), 9);
        assert_eq!(rounds[5].packet_numbers, (25..=34).collect::<Vec<_>>());
        assert_eq!(rounds.len(), 7);
        assert_eq!(rounds[6].congestion_window_mss, 11);
        assert_eq!(rounds[6].packet_numbers, (35..=40).collect::<Vec<_>>());
    }

    #[test]
    fn no_packets_no_rounds() {
        assert!(simulate(1460, 11680, 0, None).unwrap().is_empty());
    }

    #[test]
    fn every_packet_sent_once_in_order() {
        let rounds = simulate(1000, 6000, 57, Some(700)).unwrap();
        let sent: Vec<u64> = rounds
            .iter()
            .flat_map(|r| r.packet_numbers.iter().copied())
            .collect();
        assert_eq!(sent, (1..=57).collect::<Vec<_>>());
        for (idx, round) in rounds.iter().enumerate() {
            assert_eq!(round.group_number, idx as u64 + 1);
        }
    }

    #[test]
    fn oversized_packets_still_progress() {
        let rounds = simulate(500, 4000, 3, Some(1500)).unwrap();
        // 500, 1000 byte windows can't hold a packet; 2000 holds one.
        assert_eq!(windows(&rounds), vec![1, 2, 4]);
        for round in &rounds {
            assert_eq!(round.packet_numbers.len(), 1);
        }
    }

    #[test]
    fn window_never_shrinks() {
        let rounds = simulate(536, 3000, 200, None).unwrap();
        assert!(
            rounds
                .windows(2)
                .all(|w| w[1].congestion_window_mss > w[0].congestion_window_mss)
        );
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(matches!(
            simulate(0, 11680, 5, None),
            Err(Error::NotPositive {
                field: "mss_bytes",
                ..
            })
        ));
        assert!(simulate(1460, 0, 5, None).is_err());
        assert!(simulate(1460, 11680, 5, Some(0)).is_err());
    }
}
