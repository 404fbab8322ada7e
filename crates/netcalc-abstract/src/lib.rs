pub mod config;
pub mod params;
pub mod records;
pub mod worksheet;

pub use config::{ReportConfig, ReportConfigOverride};
pub use params::{
    AppConnections, BackoffParams, ByteStuffingParams, CircuitTransmissionParams,
    CircuitUtilizationParams, EffectiveDelayParams, EndToEndDelayParams, EstRttParams,
    FairBandwidthParams, MultiplexingParams, PrefixRouteParams, QueuingDelayParams, Segment,
    SegmentNumbersParams, SlowStartParams, UserGroup, UtilizationParams, VoipDelayParams,
};
pub use records::{
    BackoffRange, BandwidthShare, Completion, MatchedPrefix, QueuingDelay, Round, RouteDecision,
    Schedule, SegmentNumbers, Sender,
};
pub use worksheet::{Calculation, Problem, Worksheet};
