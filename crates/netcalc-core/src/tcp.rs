//! TCP bookkeeping: sequence/ack numbering and fair bandwidth shares.

use netcalc_abstract::{BandwidthShare, FairBandwidthParams, SegmentNumbers, SegmentNumbersParams};

use crate::error::{Error, Result, non_negative};

/// Sequence and ack numbers of segments sent back to back, assuming each
/// arrives in order and is acknowledged immediately.
pub fn segment_numbers(params: &SegmentNumbersParams) -> Result<Vec<SegmentNumbers>> {
    let mut next_seq = params.initial_ack;
    params
        .segments
        .iter()
        .map(|segment| {
            let seq_number = next_seq;
            next_seq = seq_number
                .checked_add(segment.size)
                .ok_or(Error::Overflow {
                    field: "in_order_ack_number",
                })?;
            Ok(SegmentNumbers {
                name: segment.name.clone(),
                seq_number,
                size: segment.size,
                in_order_ack_number: next_seq,
            })
        })
        .collect()
}

/// Split a bottleneck between applications in proportion to their
/// connection counts, since TCP converges to a fair share per connection.
pub fn fair_bandwidth(params: &FairBandwidthParams) -> Result<Vec<BandwidthShare>> {
    let total = non_negative("total_bandwidth", params.total_bandwidth)?;
    if params.apps.is_empty() {
        return Err(Error::Empty { field: "apps" });
    }
    let connections: u64 = params.apps.iter().map(|a| a.connection_count as u64).sum();
    if connections == 0 {
        return Err(Error::NotPositive {
            field: "total connection_count",
            value: 0.0,
        });
    }

    let per_connection = total / connections as f64;
    Ok(params
        .apps
        .iter()
        .map(|app| BandwidthShare {
            app_name: app.app_name.clone(),
            connection_count: app.connection_count,
            bandwidth: per_connection * app.connection_count as f64,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcalc_abstract::{AppConnections, Segment};

    #[test]
    fn numbers_follow_previous_ack() {
        let params = SegmentNumbersParams {
            initial_ack: 2541,
            segments: vec![
                Segment {
                    name: "P".into(),
                    size: 413,
                },
                Segment {
                    name: "Q".into(),
                    size: 382,
                },
                Segment {
                    name: "R".into(),
                    size: 245,
                },
            ],
        };
        let out = segment_numbers(&params).unwrap();
        let seqs: Vec<(u64, u64)> = out
            .iter()
            .map(|s| (s.seq_number, s.in_order_ack_number))
            .collect();
        assert_eq!(seqs, vec![(2541, 2954), (2954, 3336), (3336, 3581)]);
        assert_eq!(out[2].name, "R");
    }

    #[test]
    fn ack_past_u64_is_an_error() {
        let params = SegmentNumbersParams {
            initial_ack: u64::MAX - 10,
            segments: vec![Segment {
                name: "P".into(),
                size: 413,
            }],
        };
        assert_eq!(
            segment_numbers(&params),
            Err(Error::Overflow {
                field: "in_order_ack_number"
            })
        );
    }

    #[test]
    fn shares_by_connection() {
        let app = |name: &str, count| AppConnections {
            app_name: name.to_string(),
            connection_count: count,
        };
        let shares = fair_bandwidth(&FairBandwidthParams {
            total_bandwidth: 5900.0,
            apps: vec![app("A", 42), app("B", 3), app("C", 14)],
        })
        .unwrap();
        assert_eq!(shares[0].bandwidth, 4200.0);
        assert_eq!(shares[1].bandwidth, 300.0);
        assert_eq!(shares[2].bandwidth, 1400.0);

        let none = fair_bandwidth(&FairBandwidthParams {
            total_bandwidth: 10.0,
            apps: vec![app("idle", 0)],
        });
        assert!(none.is_err());
    }
}
