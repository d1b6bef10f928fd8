//! BitReader: reads a packed bitstream MSB-first from any I/O source that supports read().
//!
//! Byte-level reads (`byte`, `bytes`, `u64_le`) are used for the header, which is always byte
//! aligned; `bit` walks the payload.
//!

use std::io::{self, Read};

const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: BUFFER_SIZE,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer cursor has reached the end of the buffer
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // Adjust the buffer to what we actually got; empty means end of input.
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next bit (true for 1), or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<bool>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = self.buffer[self.cursor] & (0x80 >> self.bit_index) != 0;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Ok(Some(bit))
    }

    /// Returns the next 8 bits as a byte, or None if the input ends first.
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        if self.bit_index == 0 {
            if !self.have_data()? {
                return Ok(None);
            }
            let byte = self.buffer[self.cursor];
            self.cursor += 1;
            return Ok(Some(byte));
        }
        let mut byte = 0_u8;
        for _ in 0..8 {
            match self.bit()? {
                Some(bit) => byte = (byte << 1) | bit as u8,
                None => return Ok(None),
            }
        }
        Ok(Some(byte))
    }

    /// Returns exactly n bytes. Running out of input is an UnexpectedEof error.
    pub fn bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut result: Vec<u8> = Vec::with_capacity(n);
        while result.len() < n {
            match self.byte()? {
                Some(byte) => result.push(byte),
                None => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            }
        }
        Ok(result)
    }

    /// Reads a little-endian u64, as used for every count in the header.
    pub fn u64_le(&mut self) -> io::Result<u64> {
        let mut raw = [0_u8; 8];
        raw.copy_from_slice(&self.bytes(8)?);
        Ok(u64::from_le_bytes(raw))
    }

    /// Skip to the next byte boundary. Returns true if every skipped bit was 0.
    pub fn skip_padding(&mut self) -> io::Result<bool> {
        let mut clean = true;
        while self.bit_index != 0 {
            if let Some(true) = self.bit()? {
                clean = false;
            }
        }
        Ok(clean)
    }

    /// True when the input has nothing left past the current byte boundary.
    pub fn is_exhausted(&mut self) -> io::Result<bool> {
        Ok(self.bit_index == 0 && !self.have_data()?)
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;
    use std::io::{self, Read};

    /// Hands out one byte per read() call to exercise buffer refills.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&first, rest)) if !buf.is_empty() => {
                    buf[0] = first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        let bits: Vec<bool> = (0..8).map(|_| br.bit().unwrap().unwrap()).collect();
        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, true]
        );
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn byte_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.byte().unwrap(), Some(b'H'));
        assert_eq!(br.byte().unwrap(), Some(b'e'));
        assert_eq!(br.byte().unwrap(), Some(b'l'));
        assert_eq!(br.byte().unwrap(), Some(b'l'));
    }

    #[test]
    fn unaligned_byte_test() {
        let x = [0b1010_1111_u8, 0b0000_1111].as_slice();
        let mut br = BitReader::new(x);
        br.bit().unwrap();
        br.bit().unwrap();
        br.bit().unwrap();
        br.bit().unwrap();
        assert_eq!(br.byte().unwrap(), Some(0b1111_0000));
        assert_eq!(br.byte().unwrap(), None);
    }

    #[test]
    fn bytes_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.bytes(5).unwrap(), b"Hello".to_vec());
        let err = br.bytes(20).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn u64_le_test() {
        let x = [1_u8, 2, 0, 0, 0, 0, 0, 0, 9].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.u64_le().unwrap(), 0x0201);
        assert_eq!(br.byte().unwrap(), Some(9));
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        br.bytes(5).unwrap();
        br.bit().unwrap();
        assert_eq!(br.loc(), "[5.1]");
    }

    #[test]
    fn padding_and_end() {
        let x = [0b1100_0000_u8, 0b0100_0000].as_slice();
        let mut br = BitReader::new(x);
        br.bit().unwrap();
        br.bit().unwrap();
        assert!(br.skip_padding().unwrap());
        assert!(!br.is_exhausted().unwrap());
        br.bit().unwrap();
        assert!(!br.skip_padding().unwrap());
        assert!(br.is_exhausted().unwrap());
    }

    #[test]
    fn refills_across_reads() {
        let data = [0xde_u8, 0xad, 0xbe, 0xef];
        let mut br = BitReader::new(Trickle(&data));
        assert_eq!(br.byte().unwrap(), Some(0xde));
        let mut nibble = 0_u8;
        for _ in 0..4 {
            nibble = (nibble << 1) | br.bit().unwrap().unwrap() as u8;
        }
        assert_eq!(nibble, 0xa);
        assert_eq!(br.byte().unwrap(), Some(0xdb));
        assert_eq!(br.byte().unwrap(), Some(0xee));
        assert_eq!(br.byte().unwrap(), None);
    }
}
