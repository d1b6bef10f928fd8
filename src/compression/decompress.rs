use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, error, info, trace};

use super::format::{header_len, read_header};
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::decode_tree::DecodeTree;
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::output::{decompressed_name, write_output};

/// Decoded symbols are handed to the writer in chunks of this size.
const OUTPUT_CHUNK: usize = 64 * 1024;

/// Sizes reported after decompressing one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
}

/// Decompress a complete stream from `reader` onto `writer`.
///
/// Exactly the number of payload bits recorded in the header is decoded. Whatever is left in the
/// last byte must be zero padding, and nothing may follow it.
pub fn decode<R: Read, W: Write>(reader: R, mut writer: W) -> Result<DecodeStats> {
    let mut br = BitReader::new(reader);
    let header = read_header(&mut br)?;
    debug!(
        "Header: {} codes, {} payload bits.",
        header.table.len(),
        header.payload_bits
    );

    let mut output_bytes = 0_u64;
    if !header.table.is_empty() {
        let tree = DecodeTree::from_table(&header.table)?;
        trace!("Rebuilt decode tree with {} nodes.", tree.node_count());

        let root = tree.root();
        let mut node = root;
        let mut pending: Vec<u8> = Vec::with_capacity(OUTPUT_CHUNK);
        for bit_no in 0..header.payload_bits {
            let bit = br
                .bit()
                .map_err(HuffError::reading("payload"))?
                .ok_or(HuffError::Truncated("payload"))?;
            node = tree.step(node, bit).ok_or_else(|| {
                HuffError::CorruptPayload(format!(
                    "bit {} at {} follows a branch the code table does not have",
                    bit_no,
                    br.loc()
                ))
            })?;
            if let Some(symbol) = tree.symbol(node) {
                pending.push(symbol);
                node = root;
                if pending.len() == OUTPUT_CHUNK {
                    writer.write_all(&pending)?;
                    output_bytes += pending.len() as u64;
                    pending.clear();
                }
            }
        }
        if node != root {
            return Err(HuffError::CorruptPayload(
                "payload ends in the middle of a code".to_string(),
            ));
        }
        writer.write_all(&pending)?;
        output_bytes += pending.len() as u64;
    }

    if !br.skip_padding().map_err(HuffError::reading("payload"))? {
        return Err(HuffError::CorruptPayload(
            "padding bits are not zero".to_string(),
        ));
    }
    if !br.is_exhausted()? {
        return Err(HuffError::CorruptPayload(
            "unexpected data after the payload".to_string(),
        ));
    }
    writer.flush()?;

    Ok(DecodeStats {
        input_bytes: header_len(&header.table) + (header.payload_bits + 7) / 8,
        output_bytes,
        distinct_symbols: header.table.len(),
        payload_bits: header.payload_bits,
    })
}

/// Decompress one file according to `opts`. `<name>.huf` becomes `<name>`; the input is removed
/// afterwards unless asked to keep it.
pub fn decompress_file(opts: &HuffOpts, input: &Path) -> Result<DecodeStats> {
    let fin = BufReader::new(File::open(input)?);

    let stats = match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let stats = decode(fin, &mut out)?;
            out.flush()?;
            stats
        }
        Output::File => {
            let out_path = decompressed_name(input);
            let stats = write_output(&out_path, opts.force_overwrite, |w| decode(fin, w))?;
            if !opts.keep_input_files {
                fs::remove_file(input)?;
            }
            stats
        }
    };

    info!(
        "{}: {} -> {} bytes",
        input.display(),
        stats.input_bytes,
        stats.output_bytes
    );
    Ok(stats)
}

/// Decompress the files named in `opts`, or stdin to stdout when there are none.
pub fn decompress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        decode(stdin.lock(), &mut out)?;
        return Ok(out.flush()?);
    }
    for_each_file(opts, |file| decompress_file(opts, file).map(|_| ()))
}

/// Decode the files named in `opts` (or stdin) and discard the output, checking that each one
/// is a complete, well-formed stream. Never writes or removes files.
pub fn test(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let stdin = io::stdin();
        let stats = decode(stdin.lock(), io::sink())?;
        info!("(stdin): ok, {} bytes", stats.output_bytes);
        return Ok(());
    }
    for_each_file(opts, |file| {
        let stats = decode(BufReader::new(File::open(file)?), io::sink())?;
        info!("{}: ok, {} bytes", file.display(), stats.output_bytes);
        Ok(())
    })
}

/// Run `work` on every file, logging failures. Returns the first one.
fn for_each_file<F>(opts: &HuffOpts, mut work: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut first_error = None;
    for file in &opts.files {
        if let Err(e) = work(file) {
            error!("{}: {}", file.display(), e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}
