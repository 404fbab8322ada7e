use netcalc_abstract::{CircuitUtilizationParams, UtilizationParams};

use crate::delay::transmission_time_ms;
use crate::error::{Error, Result, non_negative, nonzero, positive};

/// Fraction of time a sender keeps the link busy.
///
/// Without a window this is the stop-and-wait utilization
/// `t / (t + RTT)`; with a receiver window the sender pipelines
/// `floor(window / packet)` packets per round trip.
pub fn network_utilization(params: &UtilizationParams) -> Result<f64> {
    let packet_size = positive("packet_size_bytes", params.packet_size_bytes)?;
    let rtt_ms = non_negative("rtt_ms", params.rtt_ms)?;
    let transmission = transmission_time_ms(packet_size, params.rate_bps)?;

    let pipelined = match params.window_bytes {
        Some(window) => (non_negative("window_bytes", window)? / packet_size).floor(),
        None => 1.0,
    };

    Ok(transmission / (transmission + rtt_ms) * pipelined)
}

/// Total utilization, in percent, of a circuit-switched link split evenly
/// between `total_users` users.
pub fn circuit_utilization_percent(params: &CircuitUtilizationParams) -> Result<f64> {
    let total_users = nonzero("total_users", params.total_users as u64)?;
    let grouped: u64 = params.groups.iter().map(|g| g.user_count as u64).sum();
    if grouped != total_users {
        return Err(Error::CountMismatch {
            what: "total_users vs users across groups",
            declared: total_users,
            actual: grouped,
        });
    }

    let share = 1.0 / total_users as f64;
    let mut total = 0.0;
    for group in &params.groups {
        let percent = non_negative("utilization_percent", group.utilization_percent)?;
        if percent > 100.0 {
            return Err(Error::OutOfRange {
                field: "utilization_percent",
                value: percent,
                min: 0.0,
                max: 100.0,
            });
        }
        total += group.user_count as f64 * (percent / 100.0) * share;
    }
    Ok(total * 100.0)
}
