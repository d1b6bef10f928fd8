//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use huffzip::compression::compress::compress;
use huffzip::compression::decompress::{decompress, test};
use huffzip::tools::cli::{huffopts_init, Mode};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace.
    // Logs go to stderr so they never mix with data sent to stdout.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("huffzip: could not start logging: {}", e);
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options),
        Mode::Unzip => decompress(&options),
        Mode::Test => test(&options),
    };

    match result {
        Ok(()) => info!("Done."),
        Err(e) => {
            // Per-file failures were already logged as they happened.
            if options.files.is_empty() {
                error!("(stdin): {}", e);
            }
            std::process::exit(1);
        }
    }
}
