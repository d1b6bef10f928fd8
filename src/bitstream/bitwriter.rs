use std::io::{self, Write};

use crate::huffman_coding::code_table::Code;

/// Packed bytes are handed to the underlying writer in chunks of this size.
const OUTPUT_CHUNK: usize = 64 * 1024;

/// Packs bits MSB-first into bytes and writes them to any `Write`. Call flush() when done, or the
/// last partial byte stays in the queue.
pub struct BitWriter<W: Write> {
    /// Output buffer of packed bytes not yet handed to the writer.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, excluding padding.
    bits_written: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(OUTPUT_CHUNK),
            queue: 0,
            q_bits: 0,
            bits_written: 0,
            writer,
        }
    }

    /// Move full bytes from the queue to the output buffer once the queue is nearly full, and the
    /// output buffer to the writer once it reaches a chunk.
    fn push_queue(&mut self) -> io::Result<()> {
        if self.q_bits > 56 {
            while self.q_bits > 7 {
                let byte = (self.queue >> (self.q_bits - 8)) as u8;
                self.output.push(byte); //push the packed byte out
                self.q_bits -= 8; //adjust the count of bits left in the queue
            }
        }
        if self.output.len() >= OUTPUT_CHUNK {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    pub fn out_bit(&mut self, bit: bool) -> io::Result<()> {
        self.push_queue()?;
        self.queue = (self.queue << 1) | bit as u64;
        self.q_bits += 1;
        self.bits_written += 1;
        Ok(())
    }

    /// Put a symbol's code on the stream, first bit first.
    pub fn out_code(&mut self, code: &Code) -> io::Result<()> {
        code.bits().iter().try_for_each(|&bit| self.out_bit(bit))
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits, then writes everything out and flushes the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        // First push out all the full bytes
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        // Then push out the remaining bits
        if self.q_bits > 0 {
            let byte = (self.queue << (8 - self.q_bits)) as u8;
            self.output.push(byte);
            self.q_bits = 0;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Bytes produced so far, counting a partial byte as a whole one.
    pub fn bytes_written(&self) -> u64 {
        (self.bits_written + 7) / 8
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::huffman_coding::code_table::Code;

    fn code(ascii: &str) -> Code {
        Code::from_ascii(ascii.as_bytes()).unwrap()
    }

    #[test]
    fn whole_byte_code_test() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        bw.out_code(&code("01111000")).unwrap();
        bw.flush().unwrap();
        assert_eq!(out, b"x".to_vec());
    }

    #[test]
    fn last_bits_test() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        for c in ["11111111", "00000001", "10000000", "11111111", "111"] {
            bw.out_code(&code(c)).unwrap();
        }
        bw.flush().unwrap();
        assert_eq!(bw.bits_written(), 35);
        assert_eq!(out, vec![255, 1, 128, 255, 0b1110_0000]);
    }

    #[test]
    fn codes_pack_msb_first() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        // aaaabbbccd with a=0 b=10 c=111 d=110
        for c in ["0", "0", "0", "0", "10", "10", "10", "111", "111", "110"] {
            bw.out_code(&code(c)).unwrap();
        }
        bw.flush().unwrap();
        assert_eq!(bw.bits_written(), 19);
        assert_eq!(bw.bytes_written(), 3);
        assert_eq!(out, vec![0b0000_1010, 0b1011_1111, 0b1100_0000]);
    }

    #[test]
    fn no_padding_byte_when_aligned() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        bw.out_code(&code("10101010")).unwrap();
        bw.flush().unwrap();
        assert_eq!(out, vec![0b1010_1010]);
    }

    #[test]
    fn long_runs_cross_chunk_boundaries() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        let total = 200_000 * 8 + 3;
        for i in 0..total {
            bw.out_bit(i % 3 == 0).unwrap();
        }
        bw.flush().unwrap();
        assert_eq!(out.len(), 200_001);
        // bit 0, 3, 6 set in the first byte
        assert_eq!(out[0], 0b1001_0010);
        // last three bits are positions total-3.. total-1
        let tail = (total - 3..total).fold(0u8, |acc, i| (acc << 1) | (i % 3 == 0) as u8);
        assert_eq!(out[200_000], tail << 5);
    }
}
