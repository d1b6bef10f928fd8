//! Decoder-side tree, rebuilt from a code table rather than from frequencies.
//!
//! The tree lives in an arena; node 0 is the root. Each code is walked from the root, creating
//! missing nodes along the way, and its terminal node becomes the symbol's leaf. A code that runs
//! through an existing leaf, or ends on a node that already has children or a symbol, means the
//! table is not prefix-free and is rejected.

use crate::error::{HuffError, Result};

use super::code_table::CodeTable;

pub type NodeId = usize;

#[derive(Debug, Default, Clone)]
struct Slot {
    kids: [Option<NodeId>; 2],
    symbol: Option<u8>,
}

impl Slot {
    fn has_kids(&self) -> bool {
        self.kids.iter().any(Option::is_some)
    }
}

#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<Slot>,
}

impl DecodeTree {
    pub fn from_table(table: &CodeTable) -> Result<DecodeTree> {
        let mut tree = DecodeTree {
            nodes: vec![Slot::default()],
        };

        for (symbol, code) in table.entries() {
            if code.is_empty() {
                return Err(HuffError::MalformedTable(format!(
                    "symbol {:#04x} has an empty code",
                    symbol
                )));
            }

            let mut current = tree.root();
            for &bit in code.bits() {
                if tree.nodes[current].symbol.is_some() {
                    return Err(prefix_clash(symbol));
                }
                current = match tree.nodes[current].kids[bit as usize] {
                    Some(next) => next,
                    None => {
                        let next = tree.nodes.len();
                        tree.nodes.push(Slot::default());
                        tree.nodes[current].kids[bit as usize] = Some(next);
                        next
                    }
                };
            }

            let leaf = &mut tree.nodes[current];
            if leaf.symbol.is_some() || leaf.has_kids() {
                return Err(prefix_clash(symbol));
            }
            leaf.symbol = Some(symbol);
        }

        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Follow one bit down from `node`. None if the tree has no such branch.
    pub fn step(&self, node: NodeId, bit: bool) -> Option<NodeId> {
        self.nodes[node].kids[bit as usize]
    }

    /// The symbol held by `node` when it is a leaf.
    pub fn symbol(&self, node: NodeId) -> Option<u8> {
        self.nodes[node].symbol
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn prefix_clash(symbol: u8) -> HuffError {
    HuffError::MalformedTable(format!(
        "code for symbol {:#04x} is a prefix of, or prefixed by, another code",
        symbol
    ))
}
