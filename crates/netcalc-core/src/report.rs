use netcalc_abstract::{
    BackoffRange, BandwidthShare, Completion, QueuingDelay, ReportConfig, RouteDecision, Round,
    SegmentNumbers,
};
use serde::Serialize;

use crate::stuffing::StuffedFrame;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Rounds(Vec<Round>),
    Completions(Vec<Completion>),
    Milliseconds(f64),
    Percent(f64),
    /// Raw ratio, 1.0 meaning a fully busy link
    Fraction(f64),
    QueuingDelay(QueuingDelay),
    Backoff(BackoffRange),
    Segments(Vec<SegmentNumbers>),
    Bandwidth(Vec<BandwidthShare>),
    Stuffed(StuffedFrame),
    Route(RouteDecision),
}

impl Answer {
    /// One-line human-readable rendering used in logs.
    pub fn summary(&self, precision: usize) -> String {
        match self {
            Answer::Rounds(rounds) => {
                let windows: Vec<String> = rounds
                    .iter()
                    .map(|r| format!("{}x{}", r.congestion_window_mss, r.packet_numbers.len()))
                    .collect();
                format!(
                    "{} rounds (cwnd MSS x packets): {}",
                    rounds.len(),
                    windows.join(", ")
                )
            }
            Answer::Completions(completions) => completions
                .iter()
                .map(|c| format!("#{} at {:.precision$}s", c.turn_order, c.finish_time_seconds))
                .collect::<Vec<_>>()
                .join(", "),
            Answer::Milliseconds(ms) => format!("{ms:.precision$} ms"),
            Answer::Percent(p) => format!("{p:.precision$}%"),
            Answer::Fraction(f) => format!("{f:.precision$} ({:.precision$}%)", f * 100.0),
            Answer::QueuingDelay(q) => match (q.average_over, q.average_ms) {
                (Some(n), Some(avg)) => format!(
                    "packet {} waits {:.precision$} ms; first {} average {:.precision$} ms",
                    q.packet_number, q.delay_ms, n, avg
                ),
                _ => format!("packet {} waits {:.precision$} ms", q.packet_number, q.delay_ms),
            },
            Answer::Backoff(b) => {
                let mut out = format!(
                    "K in 0..={}, wait {:.precision$}..{:.precision$} ms (bit time {:.9} ms)",
                    b.max_slot, b.min_wait_ms, b.max_wait_ms, b.bit_time_ms
                );
                if let (Some(k), Some(wait)) = (b.sampled_slot, b.sampled_wait_ms) {
                    out.push_str(&format!("; drew K={k}, {wait:.precision$} ms"));
                }
                out
            }
            Answer::Segments(segments) => segments
                .iter()
                .map(|s| format!("{}: seq={} ack={}", s.name, s.seq_number, s.in_order_ack_number))
                .collect::<Vec<_>>()
                .join(", "),
            Answer::Bandwidth(shares) => shares
                .iter()
                .map(|s| format!("{}: {:.precision$}", s.app_name, s.bandwidth))
                .collect::<Vec<_>>()
                .join(", "),
            Answer::Stuffed(frame) => frame.hex.clone(),
            Answer::Route(route) => match &route.matched {
                Some(m) => format!("port {} via '{}' ({})", route.port, m.prefix, route.binary_address),
                None => format!("default port {} ({})", route.port, route.binary_address),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemOutcome {
    pub label: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetReport {
    pub name: String,
    pub description: String,
    pub config: ReportConfig,
    pub outcomes: Vec<ProblemOutcome>,
    pub solved: usize,
    pub failed: usize,
}

impl WorksheetReport {
    pub fn outcome(&self, label: &str) -> Option<&ProblemOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}
