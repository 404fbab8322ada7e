//! Delay formulas: transmission, propagation, queuing, circuit setup,
//! store-and-forward and VoIP packetization.

use netcalc_abstract::{
    CircuitTransmissionParams, EffectiveDelayParams, EndToEndDelayParams, QueuingDelay,
    QueuingDelayParams, VoipDelayParams,
};

use crate::error::{Error, Result, finite, non_negative, nonzero, positive};
use crate::units::{MS_PER_SECOND, bytes_to_bits};

/// Time to push `length_bytes` onto a link of `rate_bps`, in seconds.
pub fn transmission_time_seconds(length_bytes: f64, rate_bps: f64) -> Result<f64> {
    let length_bytes = non_negative("length_bytes", length_bytes)?;
    let rate_bps = positive("rate_bps", rate_bps)?;
    Ok(bytes_to_bits(length_bytes) / rate_bps)
}

pub fn transmission_time_ms(length_bytes: f64, rate_bps: f64) -> Result<f64> {
    Ok(transmission_time_seconds(length_bytes, rate_bps)? * MS_PER_SECOND)
}

pub fn propagation_delay_seconds(distance_km: f64, speed_mps: f64) -> Result<f64> {
    let distance_km = non_negative("distance_km", distance_km)?;
    let speed_mps = positive("propagation_speed_mps", speed_mps)?;
    Ok(distance_km * 1000.0 / speed_mps)
}

/// Queuing delay of the `packet_number`-th packet (1-based) behind
/// equally-sized packets already waiting for the same link.
pub fn queuing_delay_ms(packet_size_bytes: f64, rate_bps: f64, packet_number: u64) -> Result<f64> {
    let packet_number = nonzero("packet_number", packet_number)?;
    let per_packet = transmission_time_ms(packet_size_bytes, rate_bps)?;
    Ok(per_packet * (packet_number - 1) as f64)
}

/// Mean queuing delay over packets `1..=n`.
pub fn average_queuing_delay_ms(packet_size_bytes: f64, rate_bps: f64, n: u64) -> Result<f64> {
    let n = nonzero("average_over", n)?;
    let mut total = 0.0;
    for packet_number in 1..=n {
        total += queuing_delay_ms(packet_size_bytes, rate_bps, packet_number)?;
    }
    Ok(total / n as f64)
}

pub fn queuing_delay(params: &QueuingDelayParams) -> Result<QueuingDelay> {
    let delay_ms = queuing_delay_ms(params.packet_size_bytes, params.rate_bps, params.packet_number)?;
    let average_ms = params
        .average_over
        .map(|n| average_queuing_delay_ms(params.packet_size_bytes, params.rate_bps, n))
        .transpose()?;
    Ok(QueuingDelay {
        packet_number: params.packet_number,
        delay_ms,
        average_over: params.average_over,
        average_ms,
    })
}

/// File transfer time over a circuit whose capacity is split evenly between
/// `users_sharing` users, plus the circuit setup time.
pub fn circuit_transmission_time_ms(params: &CircuitTransmissionParams) -> Result<f64> {
    let users = nonzero("users_sharing", params.users_sharing as u64)?;
    let rate_bps = positive("rate_bps", params.rate_bps)?;
    let setup_ms = non_negative("setup_time_ms", params.setup_time_ms)?;
    Ok(transmission_time_ms(params.file_size_bytes, rate_bps / users as f64)? + setup_ms)
}

fn utilization_fraction(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value >= 1.0 {
        return Err(Error::Saturated(value));
    }
    if value < 0.0 {
        return Err(Error::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(value)
}

/// Delay on an idle link, given the delay observed at `utilization`.
pub fn initial_delay_ms(effective_delay_ms: f64, utilization: f64) -> Result<f64> {
    let utilization = utilization_fraction("known_utilization", utilization)?;
    Ok(non_negative("known_delay_ms", effective_delay_ms)? * (1.0 - utilization))
}

/// Delay grows as `D0 / (1 - U)` while the link fills up.
pub fn effective_delay_ms(utilization: f64, initial_delay_ms: f64) -> Result<f64> {
    let utilization = utilization_fraction("target_utilization", utilization)?;
    Ok(non_negative("initial_delay_ms", initial_delay_ms)? / (1.0 - utilization))
}

pub fn rescale_effective_delay_ms(params: &EffectiveDelayParams) -> Result<f64> {
    let initial = initial_delay_ms(params.known_delay_ms, params.known_utilization)?;
    effective_delay_ms(params.target_utilization, initial)
}

/// Store-and-forward delay of the `packet_number`-th packet across
/// `router_count + 1` equal links, plus propagation over the whole path.
pub fn end_to_end_delay_ms(params: &EndToEndDelayParams) -> Result<f64> {
    let packet_number = nonzero("packet_number", params.packet_number)?;
    let links = params.router_count as u64 + 1;
    // Packets ahead of this one each add a transmission on the first link.
    let transmissions = links
        .checked_add(packet_number - 1)
        .ok_or(Error::Overflow {
            field: "packet_number",
        })? as f64;
    let per_hop = transmission_time_seconds(params.packet_size_bytes, params.rate_bps)?;
    let propagation = propagation_delay_seconds(params.distance_km, params.propagation_speed_mps)?;
    Ok((transmissions * per_hop + propagation) * MS_PER_SECOND)
}

/// Time from the first voice sample of a packet until its last bit reaches
/// the far host: packetization, transmission and propagation.
pub fn voip_delay_ms(params: &VoipDelayParams) -> Result<f64> {
    let conversion_rate_bps = positive("conversion_rate_bps", params.conversion_rate_bps)?;
    let conversion =
        bytes_to_bits(non_negative("packet_size_bytes", params.packet_size_bytes)?) / conversion_rate_bps;
    let transmission = transmission_time_seconds(params.packet_size_bytes, params.rate_bps)?;
    let propagation = propagation_delay_seconds(params.distance_km, params.propagation_speed_mps)?;
    Ok((conversion + transmission + propagation) * MS_PER_SECOND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{gbps_to_bps, kbps_to_bps, mbps_to_bps, mibs_to_bytes};

    fn close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn transmission_and_propagation() {
        close(transmission_time_ms(1500.0, mbps_to_bps(100.0)).unwrap(), 0.12);
        close(propagation_delay_seconds(2500.0, 2.5e8).unwrap(), 0.01);
        assert!(transmission_time_seconds(1500.0, 0.0).is_err());
        assert!(propagation_delay_seconds(10.0, 0.0).is_err());
    }

    #[test]
    fn queuing() {
        close(queuing_delay_ms(1500.0, mbps_to_bps(100.0), 1).unwrap(), 0.0);
        close(queuing_delay_ms(1500.0, mbps_to_bps(100.0), 4).unwrap(), 0.36);
        // 0 + 1 + ... + 9 packets of 0.12 ms, averaged over 10
        close(average_queuing_delay_ms(1500.0, mbps_to_bps(100.0), 10).unwrap(), 0.54);
        assert!(queuing_delay_ms(1500.0, mbps_to_bps(100.0), 0).is_err());

        let report = queuing_delay(&QueuingDelayParams {
            packet_size_bytes: 1500.0,
            rate_bps: mbps_to_bps(100.0),
            packet_number: 4,
            average_over: None,
        })
        .unwrap();
        assert_eq!(report.average_ms, None);
        close(report.delay_ms, 0.36);
    }

    #[test]
    fn circuit_switched() {
        let ms = circuit_transmission_time_ms(&CircuitTransmissionParams {
            file_size_bytes: mibs_to_bytes(9.0),
            rate_bps: gbps_to_bps(47.7),
            setup_time_ms: 58.3,
            users_sharing: 15,
        })
        .unwrap();
        let expected = 9.0 * 1024.0 * 1024.0 * 8.0 / (47.7e9 / 15.0) * 1000.0 + 58.3;
        assert!((ms - expected).abs() < 1e-6);

        let err = circuit_transmission_time_ms(&CircuitTransmissionParams {
            file_size_bytes: 1.0,
            rate_bps: 1.0,
            setup_time_ms: 0.0,
            users_sharing: 0,
        });
        assert!(err.is_err());
    }

    #[test]
    fn effective_delay_round_trip() {
        let params = EffectiveDelayParams {
            known_delay_ms: 14.5,
            known_utilization: 0.0,
            target_utilization: 0.5,
        };
        close(rescale_effective_delay_ms(&params).unwrap(), 29.0);
        close(initial_delay_ms(20.0, 0.75).unwrap(), 5.0);
        assert_eq!(effective_delay_ms(1.0, 5.0), Err(Error::Saturated(1.0)));
        assert!(effective_delay_ms(-0.1, 5.0).is_err());
    }

    #[test]
    fn store_and_forward() {
        let base = EndToEndDelayParams {
            packet_size_bytes: 1500.0,
            rate_bps: mbps_to_bps(100.0),
            packet_number: 1,
            distance_km: 2500.0,
            propagation_speed_mps: 2.5e8,
            router_count: 0,
        };
        close(end_to_end_delay_ms(&base).unwrap(), 0.12 + 10.0);

        let queued = EndToEndDelayParams {
            packet_number: 5,
            router_count: 2,
            ..base
        };
        // 3 links plus 4 packets ahead
        close(end_to_end_delay_ms(&queued).unwrap(), 7.0 * 0.12 + 10.0);

        let last = EndToEndDelayParams {
            packet_number: u64::MAX,
            ..queued
        };
        assert_eq!(
            end_to_end_delay_ms(&last),
            Err(Error::Overflow {
                field: "packet_number"
            })
        );
    }

    #[test]
    fn voip() {
        let params = VoipDelayParams {
            conversion_rate_bps: kbps_to_bps(43.0),
            rate_bps: mbps_to_bps(2.3),
            packet_size_bytes: 46.0,
            distance_km: 2500.0,
            propagation_speed_mps: 2.5e8,
        };
        let expected = (368.0 / 43_000.0 + 368.0 / 2.3e6 + 0.01) * 1000.0;
        assert!((voip_delay_ms(&params).unwrap() - expected).abs() < 1e-9);
    }
}
