//! Command-line front end: a thin shell over the library's stream helpers.
//!
//! Reads one stream, writes one stream, nothing else — file enumeration,
//! progress bars, and format sniffing belong to richer hosts.  Diagnostics
//! go through `env_logger` (`RUST_LOG=debug` shows the worker lifecycle).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use zmt::config::THREAD_MAX;
use zmt::{
    compress_stream, decompress_stream, CompressOptions, DecompressOptions, Lz4Codec, Stats,
    ZstdCodec,
};

const DEFAULT_LEVEL: i32 = 3;

const USAGE: &str = "\
usage: zmt [options] [FILE]

Compress (default) or decompress FILE (or stdin) to stdout.

options:
  -d          decompress
  -z          use the zstd codec (default)
  -4          use the lz4 codec
  -#          compression level, e.g. -1 .. -22 (zstd), -1 .. -15 (lz4)
  -T N        worker threads (default: number of CPUs)
  -B SIZE     chunk size in bytes; K/M suffixes accepted (default: by level)
  -o FILE     write output to FILE instead of stdout
  -q          suppress the summary line
  -h          show this help
  -V          show version
";

#[derive(Clone, Copy, PartialEq)]
enum Codec {
    Zstd,
    Lz4,
}

struct Args {
    decompress: bool,
    codec: Codec,
    level: i32,
    threads: usize,
    chunk_size: usize,
    input: Option<String>,
    output: Option<String>,
    quiet: bool,
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(THREAD_MAX)
}

fn parse_size(text: &str) -> Option<usize> {
    let (digits, mult) = match text.as_bytes().last()? {
        b'k' | b'K' => (&text[..text.len() - 1], 1usize << 10),
        b'm' | b'M' => (&text[..text.len() - 1], 1usize << 20),
        _ => (text, 1),
    };
    digits.parse::<usize>().ok().map(|n| n * mult)
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args {
        decompress: false,
        codec: Codec::Zstd,
        level: DEFAULT_LEVEL,
        threads: default_threads(),
        chunk_size: 0,
        input: None,
        output: None,
        quiet: false,
    };

    let mut it = argv.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-d" => args.decompress = true,
            "-z" => args.codec = Codec::Zstd,
            "-4" => args.codec = Codec::Lz4,
            "-q" => args.quiet = true,
            "-T" => {
                let v = it.next().ok_or("-T needs a thread count")?;
                args.threads = v.parse().map_err(|_| format!("bad thread count: {v}"))?;
            }
            "-B" => {
                let v = it.next().ok_or("-B needs a size")?;
                args.chunk_size = parse_size(v).ok_or(format!("bad chunk size: {v}"))?;
            }
            "-o" => {
                let v = it.next().ok_or("-o needs a file name")?;
                args.output = Some(v.clone());
            }
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("zmt {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            other => {
                // A dash followed by digits selects the compression level.
                if let Some(digits) = other.strip_prefix('-') {
                    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                        args.level = digits.parse().map_err(|_| format!("bad level: {other}"))?;
                        continue;
                    }
                    return Err(format!("unknown option: {other}"));
                }
                if args.input.is_some() {
                    return Err(format!("more than one input file: {other}"));
                }
                args.input = Some(other.to_string());
            }
        }
    }
    Ok(args)
}

fn open_input(path: Option<&str>) -> io::Result<Box<dyn Read + Send>> {
    Ok(match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(io::stdin()),
    })
}

fn open_output(path: Option<&str>) -> io::Result<Box<dyn Write + Send>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(io::stdout()),
    })
}

fn run(args: &Args) -> Result<Stats, Box<dyn std::error::Error>> {
    let mut input = open_input(args.input.as_deref())?;
    let mut output = open_output(args.output.as_deref())?;

    let stats = if args.decompress {
        let opts = DecompressOptions {
            threads: args.threads,
            chunk_size: args.chunk_size,
        };
        match args.codec {
            Codec::Zstd => decompress_stream::<ZstdCodec, _, _>(opts, &mut input, &mut output)?,
            Codec::Lz4 => decompress_stream::<Lz4Codec, _, _>(opts, &mut input, &mut output)?,
        }
    } else {
        let opts = CompressOptions {
            threads: args.threads,
            level: args.level,
            chunk_size: args.chunk_size,
        };
        match args.codec {
            Codec::Zstd => compress_stream::<ZstdCodec, _, _>(opts, &mut input, &mut output)?,
            Codec::Lz4 => compress_stream::<Lz4Codec, _, _>(opts, &mut input, &mut output)?,
        }
    };
    output.flush()?;
    Ok(stats)
}

fn main() -> ExitCode {
    env_logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("zmt: {msg}");
            eprint!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(stats) => {
            if !args.quiet {
                let ratio = if args.decompress {
                    percent(stats.insize, stats.outsize)
                } else {
                    percent(stats.outsize, stats.insize)
                };
                eprintln!(
                    "zmt: {} -> {} bytes ({ratio:.2}%), {} frames",
                    stats.insize, stats.outsize, stats.frames_emitted
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("zmt: {e}");
            ExitCode::FAILURE
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
