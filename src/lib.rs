//! Huffman coding file compressor.
//!
//! Version 0.1.0
//!
//! Each input is compressed on its own: its byte frequencies build a Huffman tree, the resulting
//! code table is written at the front of the output, and the input is re-emitted as packed codes.
//! The table travels with the data, so a compressed file needs nothing else to be restored.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffzip -z test.txt`
//!
//! This will compress the file and create the file test.txt.huf.
//! The original file will be deleted unless `-k` is given.
//!
//! The same work is available in memory through [`encode`] and [`decode`].
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{encode, encode_stream};
pub use compression::decompress::decode;
pub use error::{HuffError, Result};
