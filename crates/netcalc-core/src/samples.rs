//! Built-in worksheet with one textbook problem per calculator.

use netcalc_abstract::*;
use std::collections::BTreeMap;

use crate::units::{gbps_to_bps, kbps_to_bps, kibs_to_bytes, mbps_to_bps, mibs_to_bytes};

const SPEED_IN_CABLE_MPS: f64 = 2.5e8;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn stuffing_problem() -> ByteStuffingParams {
    let escapes = BTreeMap::from([
        ("soh".to_string(), strings(&["esc", "x"])),
        ("eot".to_string(), strings(&["esc", "y"])),
        ("esc".to_string(), strings(&["esc", "z"])),
    ]);
    let symbols = [
        ("soh", "01h"),
        ("eot", "04h"),
        ("esc", "1Bh"),
        ("x", "78h"),
        ("y", "79h"),
        ("z", "7Ah"),
    ]
    .into_iter()
    .map(|(name, hex)| (name.to_string(), hex.to_string()))
    .collect();
    ByteStuffingParams {
        input_hex: "78h 04h 1Bh 7Ah 01h 1Bh".to_string(),
        escapes,
        symbols,
        include_framing: true,
    }
}

pub fn sample_worksheet() -> Worksheet {
    let problems = vec![
        Problem::new(
            "slow start, 15 packets",
            Calculation::SlowStart(SlowStartParams {
                mss_bytes: 1460,
                window_limit_bytes: 11680,
                packet_count: 15,
                packet_size_bytes: None,
            }),
        ),
        Problem::new(
            "statistical multiplexing, 11 MiB vs 36 KiB",
            Calculation::Multiplexing(MultiplexingParams {
                link_rate_bps: mbps_to_bps(37.6),
                sender_count: 2,
                start_time_seconds: 0.0,
                file_sizes_bytes: vec![mibs_to_bytes(11.0), kibs_to_bytes(36.0)],
                payload_bytes: 1000.0,
                header_bytes: 24.0,
            }),
        ),
        Problem::new(
            "queuing delay, 4th packet",
            Calculation::QueuingDelay(QueuingDelayParams {
                packet_size_bytes: 1500.0,
                rate_bps: gbps_to_bps(0.1),
                packet_number: 4,
                average_over: Some(10),
            }),
        ),
        Problem::new(
            "circuit-switched transfer of 9 MiB",
            Calculation::CircuitTransmission(CircuitTransmissionParams {
                file_size_bytes: mibs_to_bytes(9.0),
                rate_bps: gbps_to_bps(47.7),
                setup_time_ms: 58.3,
                users_sharing: 15,
            }),
        ),
        Problem::new(
            "circuit-switched utilization",
            Calculation::CircuitUtilization(CircuitUtilizationParams {
                total_users: 5,
                groups: vec![
                    UserGroup {
                        user_count: 2,
                        utilization_percent: 85.0,
                    },
                    UserGroup {
                        user_count: 2,
                        utilization_percent: 44.0,
                    },
                    UserGroup {
                        user_count: 1,
                        utilization_percent: 11.0,
                    },
                ],
            }),
        ),
        Problem::new(
            "pipelined utilization",
            Calculation::Utilization(UtilizationParams {
                packet_size_bytes: 1500.0,
                rate_bps: mbps_to_bps(100.0),
                rtt_ms: 21.4 * 2.0,
                window_bytes: Some(8948.0),
            }),
        ),
        Problem::new(
            "estimated RTT",
            Calculation::EstRtt(EstRttParams {
                initial_est_rtt_ms: 34.4,
                samples_ms: vec![43.8, 44.9, 17.4],
                weight: 0.4,
            }),
        ),
        Problem::new(
            "backoff after 10 collisions",
            Calculation::Backoff(BackoffParams {
                collision_count: 10,
                rate_bps: mbps_to_bps(10.0),
                seed: None,
            }),
        ),
        Problem::new(
            "effective delay at 7.8% load",
            Calculation::EffectiveDelay(EffectiveDelayParams {
                known_delay_ms: 14.5,
                known_utilization: 0.0,
                target_utilization: 0.078,
            }),
        ),
        Problem::new(
            "end-to-end delay, 5th packet",
            Calculation::EndToEndDelay(EndToEndDelayParams {
                packet_size_bytes: 1500.0,
                rate_bps: mbps_to_bps(100.0),
                packet_number: 5,
                distance_km: 2500.0,
                propagation_speed_mps: SPEED_IN_CABLE_MPS,
                router_count: 0,
            }),
        ),
        Problem::new(
            "VoIP delay",
            Calculation::VoipDelay(VoipDelayParams {
                conversion_rate_bps: kbps_to_bps(43.0),
                rate_bps: mbps_to_bps(2.3),
                packet_size_bytes: 46.0,
                distance_km: 2500.0,
                propagation_speed_mps: SPEED_IN_CABLE_MPS,
            }),
        ),
        Problem::new(
            "sequence and ack numbers",
            Calculation::SegmentNumbers(SegmentNumbersParams {
                initial_ack: 2541,
                segments: [("P", 413), ("Q", 382), ("R", 245)]
                    .into_iter()
                    .map(|(name, size)| Segment {
                        name: name.to_string(),
                        size,
                    })
                    .collect(),
            }),
        ),
        Problem::new(
            "TCP fair bandwidth",
            Calculation::FairBandwidth(FairBandwidthParams {
                total_bandwidth: 5000.0,
                apps: [("A", 42), ("B", 3), ("C", 14)]
                    .into_iter()
                    .map(|(name, count)| AppConnections {
                        app_name: name.to_string(),
                        connection_count: count,
                    })
                    .collect(),
            }),
        ),
        Problem::new("byte stuffing", Calculation::ByteStuffing(stuffing_problem())),
        Problem::new(
            "longest prefix match",
            Calculation::PrefixRoute(PrefixRouteParams {
                address: "155.124.185.14".to_string(),
                routing_table: strings(&[
                    "10001100 00011011 01011101",
                    "10001100 00011011 01011101 000",
                    "10001100 00011011 01011101 01",
                    "10001100 00011011 01011110 00100",
                ]),
                default_port: 4,
                ports: Vec::new(),
            }),
        ),
    ];

    Worksheet {
        name: "sample".to_string(),
        description: "One textbook problem per calculator".to_string(),
        config: ReportConfigOverride::default(),
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_every_calculator_once() {
        let sheet = sample_worksheet();
        let kinds: HashSet<&str> = sheet.problems.iter().map(|p| p.calculation.kind()).collect();
        assert_eq!(kinds.len(), sheet.problems.len());
        assert_eq!(kinds.len(), 15);
    }
}
