//! Unit conversions. Sizes use binary prefixes, link rates decimal ones.

pub const BITS_PER_BYTE: f64 = 8.0;
pub const MS_PER_SECOND: f64 = 1000.0;

pub fn kibs_to_bytes(kibs: f64) -> f64 {
    kibs * 1024.0
}

pub fn mibs_to_bytes(mibs: f64) -> f64 {
    mibs * 1024.0 * 1024.0
}

pub fn kbps_to_bps(kbps: f64) -> f64 {
    kbps * 1_000.0
}

pub fn mbps_to_bps(mbps: f64) -> f64 {
    mbps * 1_000_000.0
}

pub fn gbps_to_bps(gbps: f64) -> f64 {
    gbps * 1_000_000_000.0
}

pub fn bytes_to_bits(bytes: f64) -> f64 {
    bytes * BITS_PER_BYTE
}
