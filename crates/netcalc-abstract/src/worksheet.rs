use crate::config::ReportConfigOverride;
use crate::params::*;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Worksheet {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ReportConfigOverride,
    pub problems: Vec<Problem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Problem {
    pub label: String,
    #[serde(flatten)]
    pub calculation: Calculation,
}

impl Problem {
    pub fn new(label: impl Into<String>, calculation: Calculation) -> Self {
        Self {
            label: label.into(),
            calculation,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Calculation {
    /// TCP slow-start rounds
    SlowStart(SlowStartParams),
    /// Finish times of senders sharing one link round-robin
    Multiplexing(MultiplexingParams),
    QueuingDelay(QueuingDelayParams),
    CircuitTransmission(CircuitTransmissionParams),
    CircuitUtilization(CircuitUtilizationParams),
    /// Stop-and-wait or pipelined sender utilization
    Utilization(UtilizationParams),
    EstRtt(EstRttParams),
    /// Ethernet binary exponential backoff after a collision
    Backoff(BackoffParams),
    EffectiveDelay(EffectiveDelayParams),
    EndToEndDelay(EndToEndDelayParams),
    VoipDelay(VoipDelayParams),
    SegmentNumbers(SegmentNumbersParams),
    FairBandwidth(FairBandwidthParams),
    ByteStuffing(ByteStuffingParams),
    PrefixRoute(PrefixRouteParams),
}

impl Calculation {
    pub fn kind(&self) -> &'static str {
        match self {
            Calculation::SlowStart(_) => "slow_start",
            Calculation::Multiplexing(_) => "multiplexing",
            Calculation::QueuingDelay(_) => "queuing_delay",
            Calculation::CircuitTransmission(_) => "circuit_transmission",
            Calculation::CircuitUtilization(_) => "circuit_utilization",
            Calculation::Utilization(_) => "utilization",
            Calculation::EstRtt(_) => "est_rtt",
            Calculation::Backoff(_) => "backoff",
            Calculation::EffectiveDelay(_) => "effective_delay",
            Calculation::EndToEndDelay(_) => "end_to_end_delay",
            Calculation::VoipDelay(_) => "voip_delay",
            Calculation::SegmentNumbers(_) => "segment_numbers",
            Calculation::FairBandwidth(_) => "fair_bandwidth",
            Calculation::ByteStuffing(_) => "byte_stuffing",
            Calculation::PrefixRoute(_) => "prefix_route",
        }
    }
}
