//! Byte stuffing by table lookup: each special byte in the payload is
//! replaced by its escape sequence, and the frame is optionally wrapped in
//! start/end flag bytes.

use bytes::{BufMut, Bytes, BytesMut};
use netcalc_abstract::ByteStuffingParams;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::{Error, Result};

/// Symbol names used for the frame delimiters in named tables.
pub const FRAME_START: &str = "soh";
pub const FRAME_END: &str = "eot";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StuffingTable {
    frame_start: Option<u8>,
    frame_end: Option<u8>,
    escapes: BTreeMap<u8, Vec<u8>>,
}

impl StuffingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape(mut self, special: u8, sequence: impl Into<Vec<u8>>) -> Self {
        self.escapes.insert(special, sequence.into());
        self
    }

    pub fn with_framing(mut self, start: u8, end: u8) -> Self {
        self.frame_start = Some(start);
        self.frame_end = Some(end);
        self
    }

    /// Build a table from symbolic names, e.g. `esc -> [esc, z]` with
    /// `esc = 1Bh` and `z = 7Ah`. `soh`/`eot` become the frame delimiters
    /// when the symbol table defines both.
    pub fn from_named(
        escapes: &BTreeMap<String, Vec<String>>,
        symbols: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let lookup = |name: &str| -> Result<u8> {
            let token = symbols
                .get(name)
                .ok_or_else(|| Error::UnknownSymbol(name.to_string()))?;
            parse_hex_token(token)
        };

        let mut table = Self::new();
        for (special, sequence) in escapes {
            let bytes = sequence
                .iter()
                .map(|name| lookup(name.as_str()))
                .collect::<Result<Vec<_>>>()?;
            table = table.with_escape(lookup(special.as_str())?, bytes);
        }
        if symbols.contains_key(FRAME_START) && symbols.contains_key(FRAME_END) {
            table = table.with_framing(lookup(FRAME_START)?, lookup(FRAME_END)?);
        }
        Ok(table)
    }

    pub fn stuff(&self, payload: &[u8], include_framing: bool) -> Result<Bytes> {
        let mut out = BytesMut::with_capacity(payload.len() * 2 + 2);
        if include_framing {
            out.put_u8(
                self.frame_start
                    .ok_or_else(|| Error::UnknownSymbol(FRAME_START.to_string()))?,
            );
        }
        for &byte in payload {
            match self.escapes.get(&byte) {
                Some(sequence) => out.put_slice(sequence),
                None => out.put_u8(byte),
            }
        }
        if include_framing {
            out.put_u8(
                self.frame_end
                    .ok_or_else(|| Error::UnknownSymbol(FRAME_END.to_string()))?,
            );
        }
        Ok(out.freeze())
    }
}

/// Parse one `1Bh`-style token.
pub fn parse_hex_token(token: &str) -> Result<u8> {
    let digits = token
        .strip_suffix('h')
        .or_else(|| token.strip_suffix('H'))
        .filter(|d| !d.is_empty() && d.len() <= 2)
        .ok_or_else(|| Error::InvalidHexToken(token.to_string()))?;
    u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidHexToken(token.to_string()))
}

pub fn parse_hex_tokens(input: &str) -> Result<Vec<u8>> {
    input.split_whitespace().map(parse_hex_token).collect()
}

pub fn format_hex_tokens(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for (idx, byte) in bytes.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}h");
    }
    out
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StuffedFrame {
    pub hex: String,
    pub bytes: Bytes,
    pub include_framing: bool,
}

pub fn stuff_bytes(params: &ByteStuffingParams) -> Result<StuffedFrame> {
    let table = StuffingTable::from_named(&params.escapes, &params.symbols)?;
    let payload = parse_hex_tokens(&params.input_hex)?;
    let bytes = table.stuff(&payload, params.include_framing)?;
    Ok(StuffedFrame {
        hex: format_hex_tokens(&bytes),
        bytes,
        include_framing: params.include_framing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook_params(include_framing: bool) -> ByteStuffingParams {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let escapes = BTreeMap::from([
            ("soh".to_string(), names(&["esc", "x"])),
            ("eot".to_string(), names(&["esc", "y"])),
            ("esc".to_string(), names(&["esc", "z"])),
        ]);
        let symbols = [
            ("soh", "01h"),
            ("eot", "04h"),
            ("esc", "1Bh"),
            ("x", "78h"),
            ("y", "79h"),
            ("z", "7Ah"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        ByteStuffingParams {
            input_hex: "78h 04h 1Bh 7Ah 01h 1Bh".to_string(),
            escapes,
            symbols,
            include_framing,
        }
    }

    #[test]
    fn escapes_specials_and_frames() {
        let frame = stuff_bytes(&textbook_params(true)).unwrap();
        assert_eq!(
            frame.hex,
            "01h 78h 1Bh 79h 1Bh 7Ah 7Ah 1Bh 78h 1Bh 7Ah 04h"
        );
        assert_eq!(frame.bytes.len(), 12);
        assert_eq!(frame.bytes[0], 0x01);
    }

    #[test]
    fn without_framing() {
        let frame = stuff_bytes(&textbook_params(false)).unwrap();
        assert_eq!(frame.hex, "78h 1Bh 79h 1Bh 7Ah 7Ah 1Bh 78h 1Bh 7Ah");
    }

    #[test]
    fn builder_table() {
        let table = StuffingTable::new()
            .with_escape(0x7E, [0x7D, 0x5E])
            .with_escape(0x7D, [0x7D, 0x5D])
            .with_framing(0x7E, 0x7E);
        let out = table.stuff(&[0x41, 0x7E, 0x7D], true).unwrap();
        let expected: Vec<u8> = vec![0x7E, 0x41, 0x7D, 0x5E, 0x7D, 0x5D, 0x7E];
        assert_eq!(out.to_vec(), expected);
        assert!(StuffingTable::new().stuff(&[1], true).is_err());
    }

    #[test]
    fn token_parsing() {
        assert_eq!(parse_hex_token("1Bh"), Ok(0x1B));
        assert_eq!(parse_hex_token("aH"), Ok(0x0A));
        assert!(parse_hex_token("1B").is_err());
        assert!(parse_hex_token("h").is_err());
        assert!(parse_hex_token("1FFh").is_err());
        assert!(parse_hex_token("zzh").is_err());
        assert_eq!(format_hex_tokens(&[0x0A, 0xFF]), "0Ah FFh");
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let mut params = textbook_params(false);
        params.symbols.remove("z");
        assert_eq!(
            stuff_bytes(&params),
            Err(Error::UnknownSymbol("z".to_string()))
        );
    }
}
