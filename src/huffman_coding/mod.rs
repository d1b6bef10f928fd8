//! The huffman module derives the prefix code used by the compressor and rebuilds it for the
//! decompressor.
//!
//! Encoding side: a frequency table is turned into a tree (`tree`), and the tree into a table of
//! per-symbol codes (`code_table`). Only the code table is written to the compressed file.
//!
//! Decoding side: the code table read back from the file is turned into an arena tree
//! (`decode_tree`) which the decompressor walks one bit at a time.
//!
//! Building the tree is inherently sequential; merge order decides which tree comes out.
//!

pub mod code_table;
pub mod decode_tree;
pub mod tree;
