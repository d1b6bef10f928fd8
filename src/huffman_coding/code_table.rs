//! Code table generation: the bit path from the root to every leaf, left = 0 and right = 1.

use std::fmt;

use log::trace;
use rustc_hash::FxHashMap;

use super::tree::{HuffNode, HuffmanTree};
use crate::tools::freq_count::FrequencyTable;

/// A symbol's code, most significant (first written) bit first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// One ASCII '0' or '1' per bit, as stored in the file header.
    pub fn to_ascii(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| if b { b'1' } else { b'0' }).collect()
    }

    /// Parse the header form. Returns None if any byte is not '0' or '1'.
    pub fn from_ascii(ascii: &[u8]) -> Option<Code> {
        ascii
            .iter()
            .map(|&c| match c {
                b'0' => Some(false),
                b'1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Code::from_bits)
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits
            .iter()
            .try_for_each(|&b| f.write_str(if b { "1" } else { "0" }))
    }
}

/// Mapping from symbol to its code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable::new();
        match tree.root() {
            // Lone symbol: an empty path can't be walked by the decoder, so give it one bit.
            HuffNode::Leaf { symbol, .. } => {
                table.insert(*symbol, Code::from_bits(vec![false]));
            }
            root => {
                let mut path = Vec::new();
                table.walk(root, &mut path);
            }
        }
        table
    }

    fn walk(&mut self, node: &HuffNode, path: &mut Vec<bool>) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                self.codes.insert(*symbol, Code::from_bits(path.clone()));
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();
                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    /// Add a code, returning the code previously held by `symbol`, if any.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All entries in ascending symbol order.
    pub fn entries(&self) -> Vec<(u8, &Code)> {
        let mut entries: Vec<(u8, &Code)> = self.codes.iter().map(|(&s, c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }

    /// Exact number of payload bits needed to encode input with these counts.
    pub fn payload_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .map(|(sym, count)| count * self.get(sym).map_or(0, |c| c.len() as u64))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let entries = self.entries();
        entries.iter().enumerate().all(|(i, (_, a))| {
            entries
                .iter()
                .skip(i + 1)
                .all(|(_, b)| !a.is_prefix_of(b) && !b.is_prefix_of(a))
        })
    }

    pub fn log_codes(&self) {
        if log::log_enabled!(log::Level::Trace) {
            for (sym, code) in self.entries() {
                trace!("  {:#04x} ({:>2} bits) {}", sym, code.len(), code);
            }
        }
    }
}
