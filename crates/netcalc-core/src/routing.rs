use netcalc_abstract::{MatchedPrefix, PrefixRouteParams, RouteDecision};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::error::{Error, Result};

/// Render a dotted-quad address as 32 bits, grouped by octet:
/// `155.124.185.14` -> `10011011 01111100 10111001 00001110`.
pub fn ipv4_to_binary(address: &str) -> Result<String> {
    let addr: Ipv4Addr = address
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAddress(address.to_string()))?;
    Ok(addr
        .octets()
        .iter()
        .map(|octet| format!("{octet:08b}"))
        .collect::<Vec<_>>()
        .join(" "))
}

fn strip_prefix_spaces(prefix: &str) -> Result<String> {
    let bits: String = prefix.chars().filter(|c| !c.is_whitespace()).collect();
    if bits.len() > 32 || bits.chars().any(|c| c != '0' && c != '1') {
        return Err(Error::InvalidPrefix(prefix.to_string()));
    }
    Ok(bits)
}

/// Index of the longest table entry that prefixes `binary_address`.
/// Spaces are ignored on both sides; the earlier entry wins a tie.
pub fn longest_prefix_match(binary_address: &str, table: &[String]) -> Result<Option<usize>> {
    let address = strip_prefix_spaces(binary_address)?;
    let mut best: Option<(usize, usize)> = None;
    for (index, entry) in table.iter().enumerate() {
        let bits = strip_prefix_spaces(entry)?;
        if !address.starts_with(&bits) {
            continue;
        }
        if best.is_none_or(|(_, len)| bits.len() > len) {
            best = Some((index, bits.len()));
        }
    }
    Ok(best.map(|(index, _)| index))
}

/// Forward `params.address` through the table, falling back to the
/// default port when no prefix matches.
pub fn route(params: &PrefixRouteParams) -> Result<RouteDecision> {
    if !params.ports.is_empty() && params.ports.len() != params.routing_table.len() {
        return Err(Error::CountMismatch {
            what: "ports vs routing_table",
            declared: params.routing_table.len() as u64,
            actual: params.ports.len() as u64,
        });
    }
    let binary_address = ipv4_to_binary(&params.address)?;
    let matched = longest_prefix_match(&binary_address, &params.routing_table)?;

    let decision = match matched {
        Some(index) => RouteDecision {
            port: params.ports.get(index).copied().unwrap_or(index as u32),
            matched: Some(MatchedPrefix {
                index,
                prefix: params.routing_table[index].clone(),
            }),
            binary_address,
        },
        None => RouteDecision {
            binary_address,
            matched: None,
            port: params.default_port,
        },
    };
    debug!("{} -> port {}", params.address, decision.port);
    Ok(decision)
}
