//! The compressed file header.
//!
//! ```text
//! "HUF" '1'                          signature and format version
//! numCodes: u64 LE
//! numCodes times, ascending symbol:
//!     symbol: u8
//!     codeLength: u64 LE
//!     codeLength bytes of ASCII '0' / '1'
//! payloadBits: u64 LE                valid bits in the payload that follows
//! ```
//!
//! The payload is the packed codes, MSB-first, with the last byte zero padded. Storing the exact
//! bit count keeps the decoder from reading padding as data.

use std::io::{self, Read, Write};

use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};

pub const MAGIC: [u8; 3] = *b"HUF";
pub const VERSION: u8 = b'1';
/// One code per byte value.
pub const MAX_CODES: u64 = 256;
/// Deepest leaf a tree of 256 symbols can have.
pub const MAX_CODE_LEN: u64 = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub table: CodeTable,
    pub payload_bits: u64,
}

/// Size in bytes of the header written for `table`.
pub fn header_len(table: &CodeTable) -> u64 {
    let fixed = (MAGIC.len() + 1 + 8 + 8) as u64;
    fixed
        + table
            .entries()
            .iter()
            .map(|(_, code)| 1 + 8 + code.len() as u64)
            .sum::<u64>()
}

/// Write the header and return how many bytes it took.
pub fn write_header<W: Write>(
    writer: &mut W,
    table: &CodeTable,
    payload_bits: u64,
) -> io::Result<u64> {
    let mut bytes = Vec::with_capacity(header_len(table) as usize);
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.extend_from_slice(&(table.len() as u64).to_le_bytes());
    for (symbol, code) in table.entries() {
        bytes.push(symbol);
        bytes.extend_from_slice(&(code.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&code.to_ascii());
    }
    bytes.extend_from_slice(&payload_bits.to_le_bytes());
    writer.write_all(&bytes)?;
    Ok(bytes.len() as u64)
}

pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<Header> {
    let magic = br.bytes(MAGIC.len()).map_err(HuffError::reading("signature"))?;
    if magic != MAGIC {
        return Err(HuffError::BadSignature);
    }
    let version = br
        .byte()
        .map_err(HuffError::reading("signature"))?
        .ok_or(HuffError::Truncated("signature"))?;
    if version != VERSION {
        return Err(HuffError::UnsupportedVersion(version));
    }

    let num_codes = br.u64_le().map_err(HuffError::reading("code table"))?;
    if num_codes > MAX_CODES {
        return Err(HuffError::MalformedTable(format!(
            "{} codes declared, at most {} possible",
            num_codes, MAX_CODES
        )));
    }

    let mut table = CodeTable::new();
    for _ in 0..num_codes {
        let symbol = br
            .byte()
            .map_err(HuffError::reading("code table"))?
            .ok_or(HuffError::Truncated("code table"))?;
        let code_len = br.u64_le().map_err(HuffError::reading("code table"))?;
        if code_len == 0 || code_len > MAX_CODE_LEN {
            return Err(HuffError::MalformedTable(format!(
                "symbol {:#04x} has code length {}",
                symbol, code_len
            )));
        }
        let ascii = br
            .bytes(code_len as usize)
            .map_err(HuffError::reading("code table"))?;
        let code = Code::from_ascii(&ascii).ok_or_else(|| {
            HuffError::MalformedTable(format!(
                "code for symbol {:#04x} is not made of '0' and '1'",
                symbol
            ))
        })?;
        if table.insert(symbol, code).is_some() {
            return Err(HuffError::MalformedTable(format!(
                "symbol {:#04x} appears twice",
                symbol
            )));
        }
    }

    let payload_bits = br.u64_le().map_err(HuffError::reading("header"))?;
    match (table.is_empty(), payload_bits) {
        (true, bits) if bits > 0 => Err(HuffError::MalformedTable(format!(
            "empty code table but {} payload bits",
            bits
        ))),
        (false, 0) => Err(HuffError::MalformedTable(
            "code table present but payload is empty".to_string(),
        )),
        _ => Ok(Header {
            table,
            payload_bits,
        }),
    }
}
