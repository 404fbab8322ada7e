//! Input records for every calculator. Rates are always bits per second and
//! sizes are always bytes; the CLI and the sample worksheet convert from the
//! Mbps/Gbps/MiB figures textbook problems are usually stated in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlowStartParams {
    pub mss_bytes: u64,
    /// Window size at which growth switches from doubling to +1 MSS.
    pub window_limit_bytes: u64,
    pub packet_count: u64,
    /// Defaults to `mss_bytes` when absent.
    #[serde(default)]
    pub packet_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiplexingParams {
    pub link_rate_bps: f64,
    /// Must equal `file_sizes_bytes.len()`.
    pub sender_count: usize,
    #[serde(default)]
    pub start_time_seconds: f64,
    /// One file per sender, listed in turn order.
    pub file_sizes_bytes: Vec<f64>,
    pub payload_bytes: f64,
    pub header_bytes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuingDelayParams {
    pub packet_size_bytes: f64,
    pub rate_bps: f64,
    /// 1-based position in the queue.
    pub packet_number: u64,
    /// Also report the mean delay over the first `n` packets.
    #[serde(default)]
    pub average_over: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitTransmissionParams {
    pub file_size_bytes: f64,
    pub rate_bps: f64,
    pub setup_time_ms: f64,
    /// Users splitting the link evenly (TDM/FDM).
    pub users_sharing: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserGroup {
    pub user_count: u32,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitUtilizationParams {
    pub total_users: u32,
    pub groups: Vec<UserGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtilizationParams {
    pub packet_size_bytes: f64,
    pub rate_bps: f64,
    pub rtt_ms: f64,
    /// Receiver window for pipelined senders.
    #[serde(default)]
    pub window_bytes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstRttParams {
    pub initial_est_rtt_ms: f64,
    /// Oldest first.
    pub samples_ms: Vec<f64>,
    /// Weight given to each new sample (alpha).
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackoffParams {
    pub collision_count: u32,
    pub rate_bps: f64,
    /// Draw a concrete slot with a seeded RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveDelayParams {
    pub known_delay_ms: f64,
    pub known_utilization: f64,
    pub target_utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndToEndDelayParams {
    pub packet_size_bytes: f64,
    pub rate_bps: f64,
    pub packet_number: u64,
    pub distance_km: f64,
    pub propagation_speed_mps: f64,
    #[serde(default)]
    pub router_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoipDelayParams {
    pub conversion_rate_bps: f64,
    pub rate_bps: f64,
    pub packet_size_bytes: f64,
    pub distance_km: f64,
    pub propagation_speed_mps: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentNumbersParams {
    pub initial_ack: u64,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConnections {
    pub app_name: String,
    pub connection_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FairBandwidthParams {
    /// Any unit; shares come back in the same unit.
    pub total_bandwidth: f64,
    pub apps: Vec<AppConnections>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ByteStuffingParams {
    /// Space-separated hex tokens such as `78h 04h 1Bh`.
    pub input_hex: String,
    /// Special symbol name to the names of its escape sequence,
    /// e.g. `esc = ["esc", "z"]`.
    pub escapes: BTreeMap<String, Vec<String>>,
    /// Symbol name to hex token, e.g. `soh = "01h"`.
    pub symbols: BTreeMap<String, String>,
    #[serde(default)]
    pub include_framing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrefixRouteParams {
    /// Dotted-quad IPv4 address.
    pub address: String,
    /// Binary prefixes, optionally grouped by spaces every eight bits.
    pub routing_table: Vec<String>,
    pub default_port: u32,
    /// Output port per table row; the row index is used when empty.
    #[serde(default)]
    pub ports: Vec<u32>,
}
