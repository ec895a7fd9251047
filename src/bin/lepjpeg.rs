//! lepjpeg CLI - verified lossless JPEG <-> Lepton transcoding.
//!
//! Runs against the process-wide engine, which needs a build with the
//! `native` feature and the lepton_jpeg library on the link path.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lepjpeg_rs::{Concurrency, Digest128, TranscodeError, Transcoder};
use log::LevelFilter;
use num_enum::IntoPrimitive;

/// Verified lossless JPEG <-> Lepton transcoder
#[derive(Parser)]
#[command(name = "lepjpeg")]
#[command(author = "lepjpeg-rs contributors")]
#[command(version)]
#[command(about = "Lossless JPEG <-> Lepton transcoding with round-trip verification", long_about = None)]
#[command(after_help = "EXAMPLES:
    lepjpeg encode -i photo.jpg -o photo.lep --verify
    lepjpeg decode -i photo.lep -o photo.jpg --digest 5f0c...e1
    lepjpeg verify -i photo.jpg -t 8
    lepjpeg digest -i photo.jpg
    lepjpeg engine

ENVIRONMENT:
    LEPJPEG_THREADS   default for --threads
    RUST_LOG          log filter (overridden by -v)")]
struct Cli {
    /// Log engine calls at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JPEG into a Lepton stream
    #[command(visible_alias = "e")]
    Encode {
        /// Input JPEG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output Lepton file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        threads: Threads,

        /// Decode the result again and refuse to write it unless it matches the input
        #[arg(long)]
        verify: bool,
    },

    /// Decode a Lepton stream back into the original JPEG
    #[command(visible_alias = "d")]
    Decode {
        /// Input Lepton file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JPEG file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        threads: Threads,

        /// Expected digest of the restored JPEG (32 hex characters)
        #[arg(long)]
        digest: Option<Digest128>,
    },

    /// Round-trip a JPEG through the engine without writing anything
    #[command(visible_alias = "v")]
    Verify {
        /// Input JPEG file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        threads: Threads,
    },

    /// Print the 128-bit digest of a file
    Digest {
        /// File to hash
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show which engine is available
    Engine,
}

#[derive(clap::Args)]
struct Threads {
    /// Thread-count hint passed to the engine
    #[arg(
        short = 't',
        long = "threads",
        env = "LEPJPEG_THREADS",
        default_value_t = lepjpeg_rs::constants::DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64)
    )]
    count: u32,
}

impl Threads {
    fn concurrency(&self) -> Result<Concurrency, TranscodeError> {
        Concurrency::new(self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
enum ExitStatus {
    Failure = 1,
    // 2 is taken by clap for usage errors.
    EngineFailure = 3,
    IntegrityMismatch = 4,
    EngineUnavailable = 5,
}

impl ExitStatus {
    fn classify(err: &(dyn std::error::Error + 'static)) -> Self {
        match err.downcast_ref::<TranscodeError>() {
            Some(TranscodeError::EngineFailure { .. }) => ExitStatus::EngineFailure,
            Some(TranscodeError::IntegrityMismatch { .. }) => ExitStatus::IntegrityMismatch,
            Some(TranscodeError::EngineUnavailable) => ExitStatus::EngineUnavailable,
            _ => ExitStatus::Failure,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command, &mut io::stdout().lock()) {
        eprintln!("Error: {}", e);
        let status: u8 = ExitStatus::classify(e.as_ref()).into();
        std::process::exit(i32::from(status));
    }
}

fn run(command: Commands, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Encode {
            input,
            output,
            threads,
            verify,
        } => encode_file(Transcoder::global()?, &input, &output, &threads, verify, out),
        Commands::Decode {
            input,
            output,
            threads,
            digest,
        } => decode_file(Transcoder::global()?, &input, &output, &threads, digest, out),
        Commands::Verify { input, threads } => {
            verify_file(Transcoder::global()?, &input, &threads, out)
        }
        Commands::Digest { input } => digest_file(&input, out),
        Commands::Engine => show_engine(out),
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn encode_file(
    transcoder: Transcoder<'_>,
    input: &Path,
    output: &Path,
    threads: &Threads,
    verify: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let jpeg = fs::read(input)?;
    let concurrency = threads.concurrency()?;

    let lep = if verify {
        let artifact = transcoder.encode_and_verify(&jpeg, concurrency)?;
        writeln!(out, "✓ Verified round trip, source digest {}", artifact.source_digest())?;
        artifact.into_parts().0
    } else {
        transcoder.encode(&jpeg, concurrency)?
    };

    fs::write(output, &lep)?;
    writeln!(
        out,
        "✓ Encoded {} bytes to {} bytes ({}) -> {:?}",
        jpeg.len(),
        lep.len(),
        ratio(lep.len(), jpeg.len()),
        output
    )?;
    Ok(())
}

fn decode_file(
    transcoder: Transcoder<'_>,
    input: &Path,
    output: &Path,
    threads: &Threads,
    digest: Option<Digest128>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let lep = fs::read(input)?;
    let concurrency = threads.concurrency()?;

    // Nothing is written unless the digest matched.
    let jpeg = match digest {
        Some(expected) => transcoder.decode_and_check(&lep, expected, concurrency)?,
        None => transcoder.decode(&lep, concurrency)?,
    };

    fs::write(output, &jpeg)?;
    writeln!(
        out,
        "✓ Decoded {} bytes to {} bytes{} -> {:?}",
        lep.len(),
        jpeg.len(),
        if digest.is_some() { " (digest checked)" } else { "" },
        output
    )?;
    Ok(())
}

fn verify_file(
    transcoder: Transcoder<'_>,
    input: &Path,
    threads: &Threads,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let jpeg = fs::read(input)?;
    let artifact = transcoder.encode_and_verify(&jpeg, threads.concurrency()?)?;

    writeln!(out, "File:   {:?}", input)?;
    writeln!(out, "JPEG:   {} bytes", jpeg.len())?;
    writeln!(
        out,
        "Lepton: {} bytes ({})",
        artifact.len(),
        ratio(artifact.len(), jpeg.len())
    )?;
    writeln!(out, "Digest: {}", artifact.source_digest())?;
    writeln!(out, "✓ Round trip is lossless")?;
    Ok(())
}

fn digest_file(input: &Path, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    writeln!(out, "{}  {}", Digest128::of(&data), input.display())?;
    Ok(())
}

fn show_engine(out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    match lepjpeg_rs::engine::global() {
        Ok(engine) => {
            writeln!(out, "Engine: {}", engine.name())?;
            Ok(())
        }
        Err(e) => {
            writeln!(
                out,
                "No engine available. Rebuild with `--features native` and make {} visible to the linker.",
                lepjpeg_rs::constants::ENGINE_LIBRARY_FILE
            )?;
            Err(e.into())
        }
    }
}

fn ratio(compressed: usize, original: usize) -> String {
    if original == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", compressed as f64 * 100.0 / original as f64)
}
