use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use super::format::write_header;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::tree::HuffmanTree;
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::freq_count::FrequencyTable;
use crate::tools::output::{compressed_name, write_output};

/// Input is read in chunks of this size on both passes.
const READ_CHUNK: usize = 256 * 1024;

/// Sizes reported after compressing one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
}

impl EncodeStats {
    /// Output size over input size. 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Compress an in-memory buffer onto `writer`.
pub fn encode<W: Write>(data: &[u8], writer: W) -> Result<EncodeStats> {
    encode_stream(Cursor::new(data), writer)
}

/// Compress everything from the current position of `reader` to its end.
///
/// The input is read twice: once to count symbols, then (after seeking back) to emit codes.
pub fn encode_stream<R: Read + Seek, W: Write>(mut reader: R, mut writer: W) -> Result<EncodeStats> {
    let start = reader.stream_position()?;
    let mut buf = vec![0_u8; READ_CHUNK];

    //----- Pass one: symbol frequencies
    let mut freqs = FrequencyTable::new();
    loop {
        let n = fill(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        freqs.add(&buf[..n]);
    }
    let input_bytes = freqs.total();

    // Nothing to build a tree from: an empty table and no payload.
    let tree = match HuffmanTree::from_frequencies(&freqs) {
        Some(tree) => tree,
        None => {
            let header_bytes = write_header(&mut writer, &CodeTable::new(), 0)?;
            writer.flush()?;
            debug!("Empty input, wrote a {} byte header only.", header_bytes);
            return Ok(EncodeStats {
                input_bytes: 0,
                output_bytes: header_bytes,
                distinct_symbols: 0,
                payload_bits: 0,
            });
        }
    };
    tree.log_structure();

    let table = CodeTable::from_tree(&tree);
    table.log_codes();
    debug_assert!(table.is_prefix_free());
    let payload_bits = table.payload_bits(&freqs);
    debug!(
        "{} bytes, {} distinct symbols, {} payload bits.",
        input_bytes,
        table.len(),
        payload_bits
    );

    let header_bytes = write_header(&mut writer, &table, payload_bits)?;

    //----- Pass two: pack the codes
    reader.seek(SeekFrom::Start(start))?;
    let lookup: Vec<Option<&Code>> = (0..=u8::MAX).map(|sym| table.get(sym)).collect();
    let mut bw = BitWriter::new(writer);
    loop {
        let n = fill(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            let code = lookup[byte as usize].ok_or_else(input_changed)?;
            bw.out_code(code)?;
        }
    }
    bw.flush()?;

    if bw.bits_written() != payload_bits {
        return Err(input_changed());
    }

    Ok(EncodeStats {
        input_bytes,
        output_bytes: header_bytes + bw.bytes_written(),
        distinct_symbols: table.len(),
        payload_bits,
    })
}

fn input_changed() -> HuffError {
    HuffError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "input changed between the counting and encoding passes",
    ))
}

/// Read until `buf` is full or the input ends. Returns the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Compress one file according to `opts`. Writes `<file>.huf` (or stdout) and removes the
/// input afterwards unless asked to keep it.
pub fn compress_file(opts: &HuffOpts, input: &Path) -> Result<EncodeStats> {
    let fin = BufReader::new(File::open(input)?);

    let stats = match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let stats = encode_stream(fin, &mut out)?;
            out.flush()?;
            stats
        }
        Output::File => {
            let out_path = compressed_name(input);
            let stats = write_output(&out_path, opts.force_overwrite, |w| encode_stream(fin, w))?;
            if !opts.keep_input_files {
                fs::remove_file(input)?;
            }
            stats
        }
    };

    info!(
        "{}: {} -> {} bytes, ratio {:.3}, {} symbols",
        input.display(),
        stats.input_bytes,
        stats.output_bytes,
        stats.ratio(),
        stats.distinct_symbols
    );
    Ok(stats)
}

/// Compress the files named in `opts`, or stdin to stdout when there are none. Every file is
/// attempted; the first failure is returned.
pub fn compress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let stats = encode(&data, &mut out)?;
        out.flush()?;
        info!(
            "(stdin): {} -> {} bytes, ratio {:.3}",
            stats.input_bytes,
            stats.output_bytes,
            stats.ratio()
        );
        return Ok(());
    }

    let mut first_error = None;
    for file in &opts.files {
        if let Err(e) = compress_file(opts, file) {
            error!("{}: {}", file.display(), e);
            first_error.get_or_insert(e);
        }
    }
    if opts.files.len() > 1 && first_error.is_some() {
        warn!("Some files were not compressed.");
    }
    first_error.map_or(Ok(()), Err)
}
