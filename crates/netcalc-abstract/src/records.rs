use serde::{Deserialize, Serialize};

/// One participant in statistical multiplexing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sender {
    pub size_bytes: f64,
    /// Position in the input; breaks ties between equal packet counts.
    pub turn_order: usize,
}

/// One slow-start transmission round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    pub group_number: u64,
    pub congestion_window_mss: u64,
    pub congestion_window_bytes: u64,
    /// 1-based packet indices sent in this round.
    pub packet_numbers: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub finish_time_seconds: f64,
    pub turn_order: usize,
}

/// Completions in the order the senders finish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Schedule {
    completions: Vec<Completion>,
}

impl Schedule {
    pub fn new(completions: Vec<Completion>) -> Self {
        Self { completions }
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// The same completions re-ordered by input position.
    pub fn by_turn_order(&self) -> Vec<Completion> {
        let mut out = self.completions.clone();
        out.sort_by_key(|c| c.turn_order);
        out
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QueuingDelay {
    pub packet_number: u64,
    pub delay_ms: f64,
    pub average_over: Option<u64>,
    pub average_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentNumbers {
    pub name: String,
    pub seq_number: u64,
    pub size: u64,
    /// Ack the receiver returns, assuming in-order arrival.
    pub in_order_ack_number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandwidthShare {
    pub app_name: String,
    pub connection_count: u32,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BackoffRange {
    pub collision_count: u32,
    /// K is drawn uniformly from `0..=max_slot`.
    pub max_slot: u64,
    pub bit_time_ms: f64,
    pub min_wait_ms: f64,
    pub max_wait_ms: f64,
    pub sampled_slot: Option<u64>,
    pub sampled_wait_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchedPrefix {
    pub index: usize,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteDecision {
    pub binary_address: String,
    /// `None` when the default port was used.
    pub matched: Option<MatchedPrefix>,
    pub port: u32,
}
