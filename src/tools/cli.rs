use std::ffi::OsString;
use std::path::PathBuf;
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, LevelFilter};

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Most detailed log level shown
    pub verbosity: LevelFilter,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            output: Output::File,
            verbosity: LevelFilter::Warn,
        }
    }

    /// Parse options from an argument list (the first item is the program name).
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Args::try_parse_from(args).map(HuffOpts::from)
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "huffzip",
    version,
    about = "A Huffman coding file compressor",
    long_about = "
    Compresses each FILE to FILE.huf using a Huffman code built from the file's own byte
    frequencies. The code table is stored in the file, so FILE.huf decompresses on its own.

    If no file names are given, huffzip compresses or decompresses from standard input to
    standard output."
)]
pub struct Args {
    /// Files to process
    #[clap(value_name = "FILE", parse(from_os_str))]
    files: Vec<PathBuf>,

    /// Force compression (the default)
    #[clap(short = 'z', long = "compress", conflicts_with_all = &["decompress", "test"])]
    compress: bool,

    /// Force decompression
    #[clap(short = 'd', long = "decompress", conflicts_with = "test")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Keep (don't delete) input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Output to standard out
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Suppress noncritical error messages
    #[clap(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

impl From<Args> for HuffOpts {
    fn from(args: Args) -> Self {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress && !args.compress {
            Mode::Unzip
        } else {
            Mode::Zip
        };
        let output = if args.stdout || args.files.is_empty() {
            Output::Stdout
        } else {
            Output::File
        };
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Info,
            (false, 2) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };
        HuffOpts {
            files: args.files,
            force_overwrite: args.force,
            keep_input_files: args.keep,
            op_mode,
            output,
            verbosity,
        }
    }
}

/// Parse the process arguments and set the log level from them.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());
    log::set_max_level(opts.verbosity);

    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Sending output to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    opts
}
