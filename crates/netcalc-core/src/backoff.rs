use netcalc_abstract::{BackoffParams, BackoffRange};
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result, positive};
use crate::units::MS_PER_SECOND;

/// Slot time in bit times for 10/100 Mbps Ethernet.
pub const SLOT_BIT_TIMES: f64 = 512.0;
/// The exponent stops growing after this many collisions.
pub const MAX_BACKOFF_EXPONENT: u32 = 10;
/// Adapters give up on the frame after this many collisions.
pub const MAX_COLLISIONS: u32 = 16;

pub fn bit_time_ms(rate_bps: f64) -> Result<f64> {
    Ok(MS_PER_SECOND / positive("rate_bps", rate_bps)?)
}

/// Largest K an adapter may pick after `collision_count` collisions.
pub fn max_slot(collision_count: u32) -> Result<u64> {
    if collision_count > MAX_COLLISIONS {
        return Err(Error::ExcessiveCollisions(collision_count));
    }
    Ok((1u64 << collision_count.min(MAX_BACKOFF_EXPONENT)) - 1)
}

/// Wait after choosing slot `k`: `K * 512` bit times.
pub fn wait_time_ms(k: u64, bit_time_ms: f64) -> f64 {
    k as f64 * SLOT_BIT_TIMES * bit_time_ms
}

/// Pick K uniformly, as the adapter would.
pub fn sample_slot<R: Rng>(collision_count: u32, rng: &mut R) -> Result<u64> {
    let max = max_slot(collision_count)?;
    Ok(rng.random_range(0..=max))
}

pub fn backoff_range(params: &BackoffParams) -> Result<BackoffRange> {
    let bit_time_ms = bit_time_ms(params.rate_bps)?;
    let max_slot = max_slot(params.collision_count)?;

    let sampled_slot = match params.seed {
        Some(seed) => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            Some(sample_slot(params.collision_count, &mut rng)?)
        }
        None => None,
    };
    debug!(
        "collision {}: K in 0..={}, sampled {:?}",
        params.collision_count, max_slot, sampled_slot
    );

    Ok(BackoffRange {
        collision_count: params.collision_count,
        max_slot,
        bit_time_ms,
        min_wait_ms: 0.0,
        max_wait_ms: wait_time_ms(max_slot, bit_time_ms),
        sampled_slot,
        sampled_wait_ms: sampled_slot.map(|k| wait_time_ms(k, bit_time_ms)),
    })
}
