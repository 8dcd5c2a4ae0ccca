//! Render an APRS transmission to a file or stdout.
//!
//! ```text
//! aprstx -c M0THC-1 -o packet.s8 -f s8 "Hello from the balloon"
//! ```
//!
//! The s8 output plays out directly on a HackRF:
//!
//! ```text
//! hackrf_transfer -t packet.s8 -f 144390000 -s 2400000 -a 1 -x 40
//! ```
use std::io::Write;

use anyhow::Result;
use clap::Parser;
use log::info;

use aprstx::ax25::{parse_path, Callsign};
use aprstx::pipeline::{generate, SampleFormat, TxConfig};

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Opt {
    /// Source callsign, e.g. M0THC-1.
    #[arg(short)]
    callsign: Callsign,

    /// Destination address.
    #[arg(short, default_value = "APRS")]
    dest: Callsign,

    /// Digipeater path.
    #[arg(short, default_value = "WIDE1-1,WIDE2-1")]
    path: String,

    /// Output file. Default stdout.
    #[arg(short)]
    output: Option<std::path::PathBuf>,

    /// Sample format: s8 (HackRF), f32, or pcm (48kHz audio).
    #[arg(short, default_value = "f32")]
    format: SampleFormat,

    /// FM peak deviation in Hz.
    #[arg(long, default_value_t = 5000.0)]
    deviation: f32,

    /// Number of opening flag bytes.
    #[arg(long, default_value_t = 4)]
    preamble: usize,

    /// Zero bits sent before the first flag, for clock recovery.
    #[arg(long, default_value_t = 0)]
    run_in: usize,

    /// Verbosity level.
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The APRS information field.
    message: String,
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    stderrlog::new()
        .module(module_path!())
        .module("aprstx")
        .quiet(false)
        .verbosity(usize::from(opt.verbose) + 2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let mut cfg = TxConfig::new(opt.callsign);
    cfg.dest = opt.dest;
    cfg.path = parse_path(&opt.path)?;
    cfg.format = opt.format;
    cfg.deviation = opt.deviation;
    cfg.preamble_flags = opt.preamble;
    cfg.run_in_zeros = opt.run_in;

    let w: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let n = generate(&cfg, opt.message.as_bytes(), w)?;
    info!(
        "rendered {} bytes ({}) to {}",
        n,
        match cfg.format {
            SampleFormat::IqS8 => "s8 I/Q at 2.4Msps",
            SampleFormat::IqF32 => "f32 I/Q at 2.4Msps",
            SampleFormat::PcmF32 => "f32 PCM at 48kHz",
        },
        opt.output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string()),
    );
    Ok(())
}
