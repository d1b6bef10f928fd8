//! The compression module holds the two directions of the codec and the file format they share.
//!
//! Compression makes two passes over its input:
//! - Count how often every byte value occurs.
//! - Build the Huffman tree and code table, write the header, then re-read the input and pack
//!   each byte's code into the payload.
//!
//! Decompression reverses it in one pass:
//! - Read the header and rebuild a tree from the stored code table.
//! - Walk the tree one payload bit at a time, emitting a byte at every leaf, for exactly as many
//!   bits as the header records.
//!

pub mod compress;
pub mod decompress;
pub mod format;
