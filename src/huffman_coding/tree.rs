//! Huffman tree construction from a frequency table.
//!
//! Nodes are merged through a binary min-heap keyed by weight. Equal weights are resolved by
//! insertion sequence: leaves enter the heap in ascending symbol order and take sequence numbers
//! `0..n`, every merged node takes the next free number. The first node popped becomes the left
//! child. This makes the tree (and the codes derived from it) a pure function of the counts.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::tools::freq_count::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Join two subtrees under a new internal node. `left` takes the 0 branch.
    pub fn merge(left: HuffNode, right: HuffNode) -> HuffNode {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Heap entry. BinaryHeap is a max-heap, so the ordering is reversed to pop the lightest,
/// then the oldest, entry first.
#[derive(Debug)]
struct Pending {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Pending {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Build the tree for the counted symbols. Returns None when nothing was counted.
    ///
    /// With a single distinct symbol the root is that symbol's leaf and there are no internal
    /// nodes; the code table gives it a one bit code.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Option<HuffmanTree> {
        let mut heap: BinaryHeap<Pending> = freqs
            .iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq: seq as u64,
                node: HuffNode::Leaf { symbol, weight },
            })
            .collect();

        let mut seq = heap.len() as u64;
        while heap.len() > 1 {
            let left = heap.pop()?;
            let right = heap.pop()?;
            let node = HuffNode::merge(left.node, right.node);
            heap.push(Pending {
                weight: node.weight(),
                seq,
                node,
            });
            seq += 1;
        }

        heap.pop().map(|pending| HuffmanTree { root: pending.node })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 1,
                HuffNode::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    pub fn internal_count(&self) -> usize {
        fn count(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 0,
                HuffNode::Internal { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Dump the tree shape at trace level.
    pub fn log_structure(&self) {
        if log::log_enabled!(log::Level::Trace) {
            trace!("Huffman tree structure:");
            log_node(&self.root, 0, "root");
        }
    }
}

fn log_node(node: &HuffNode, depth: usize, label: &str) {
    let indent = "  ".repeat(depth);
    match node {
        HuffNode::Leaf { symbol, weight } => {
            trace!("{}{} -> leaf {:#04x} [weight: {}]", indent, label, symbol, weight);
        }
        HuffNode::Internal {
            weight,
            left,
            right,
        } => {
            trace!("{}{} -> internal [weight: {}]", indent, label, weight);
            log_node(left, depth + 1, "L");
            log_node(right, depth + 1, "R");
        }
    }
}

#[cfg(test)]
mod test {
    use super::{HuffNode, HuffmanTree};
    use crate::tools::freq_count::{freqs, FrequencyTable};

    fn depth_of(node: &HuffNode, target: u8, depth: usize) -> Option<usize> {
        match node {
            HuffNode::Leaf { symbol, .. } => (*symbol == target).then(|| depth),
            HuffNode::Internal { left, right, .. } => {
                depth_of(left, target, depth + 1).or_else(|| depth_of(right, target, depth + 1))
            }
        }
    }

    fn table_from(pairs: &[(u8, usize)]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for &(sym, count) in pairs {
            table.add(&vec![sym; count]);
        }
        table
    }

    #[test]
    fn empty_table_has_no_tree() {
        assert!(HuffmanTree::from_frequencies(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = HuffmanTree::from_frequencies(&freqs(b"aaaa")).unwrap();
        assert_eq!(
            tree.root(),
            &HuffNode::Leaf {
                symbol: b'a',
                weight: 4
            }
        );
        assert_eq!(tree.internal_count(), 0);
    }

    #[test]
    fn sample_text_shape() {
        let tree = HuffmanTree::from_frequencies(&freqs(b"aaaabbbccd")).unwrap();
        let root = tree.root();
        assert_eq!(root.weight(), 10);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.internal_count(), 3);

        let a = depth_of(root, b'a', 0).unwrap();
        let d = depth_of(root, b'd', 0).unwrap();
        for sym in [b'b', b'c'] {
            let depth = depth_of(root, sym, 0).unwrap();
            assert!(a < depth);
            assert!(d >= depth);
        }
        assert!(a < d);
    }

    #[test]
    fn textbook_code_lengths() {
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let table = table_from(&[
            (b'C', 32),
            (b'D', 42),
            (b'E', 120),
            (b'K', 7),
            (b'L', 42),
            (b'M', 24),
            (b'U', 37),
            (b'Z', 2),
        ]);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(tree.root().weight(), 306);
        let expected = [
            (b'E', 1),
            (b'U', 3),
            (b'D', 3),
            (b'L', 3),
            (b'C', 4),
            (b'M', 5),
            (b'K', 6),
            (b'Z', 6),
        ];
        for (sym, len) in expected {
            assert_eq!(depth_of(tree.root(), sym, 0), Some(len), "symbol {}", sym as char);
        }
    }

    #[test]
    fn equal_weights_break_ties_by_insertion_order() {
        let tree = HuffmanTree::from_frequencies(&freqs(b"abcd")).unwrap();
        // a and b merge first, then c and d, then the two pairs in that order.
        let expected = HuffNode::merge(
            HuffNode::merge(
                HuffNode::Leaf { symbol: b'a', weight: 1 },
                HuffNode::Leaf { symbol: b'b', weight: 1 },
            ),
            HuffNode::merge(
                HuffNode::Leaf { symbol: b'c', weight: 1 },
                HuffNode::Leaf { symbol: b'd', weight: 1 },
            ),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn build_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog, again and again";
        let first = HuffmanTree::from_frequencies(&freqs(data)).unwrap();
        let second = HuffmanTree::from_frequencies(&freqs(data)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = HuffmanTree::from_frequencies(&freqs(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.internal_count(), 255);
        assert_eq!(depth_of(tree.root(), 0, 0), Some(8));
        assert_eq!(depth_of(tree.root(), 255, 0), Some(8));
    }
}
