use netcalc_abstract::EstRttParams;
use tracing::debug;

use crate::error::{Error, Result, finite, non_negative};

/// Exponentially weighted moving average of RTT samples:
/// `est = (1 - weight) * est + weight * sample`, applied oldest sample first.
pub fn estimated_rtt_ms(initial_est_rtt_ms: f64, samples_ms: &[f64], weight: f64) -> Result<f64> {
    let weight = finite("weight", weight)?;
    if !(0.0..=1.0).contains(&weight) {
        return Err(Error::OutOfRange {
            field: "weight",
            value: weight,
            min: 0.0,
            max: 1.0,
        });
    }

    let mut est = non_negative("initial_est_rtt_ms", initial_est_rtt_ms)?;
    for &sample in samples_ms {
        let sample = non_negative("sample_rtt_ms", sample)?;
        est = (1.0 - weight) * est + weight * sample;
        debug!("sample {sample} ms -> estimated RTT {est} ms");
    }
    Ok(est)
}

pub fn estimated_rtt_params(params: &EstRttParams) -> Result<f64> {
    estimated_rtt_ms(params.initial_est_rtt_ms, &params.samples_ms, params.weight)
}
