//! The bitstream module is the I/O subsystem of the compressor.
//!
//! `BitWriter` packs Huffman codes MSB-first into bytes on the way out; `BitReader` hands them
//! back one bit at a time on the way in. Both wrap a plain `Write`/`Read`, so files, stdin/stdout
//! and in-memory buffers all work the same way.
//!
pub mod bitreader;
pub mod bitwriter;
