use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use ax25kiss_header::Crc16;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod monitor;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deframe KISS bytes and print every frame.
    Decode(DecodeArgs),
    /// Build one UI frame and print its wire bytes.
    Encode(EncodeArgs),
    /// Print frames received on a serial TNC.
    Monitor(MonitorArgs),
    /// Transmit generated UI frames through a serial TNC.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Checksum shown next to each frame.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum ChecksumKind {
    #[default]
    X25,
    CcittFalse,
    Xmodem,
}

impl From<ChecksumKind> for Crc16 {
    fn from(kind: ChecksumKind) -> Self {
        match kind {
            ChecksumKind::X25 => Crc16::X25,
            ChecksumKind::CcittFalse => Crc16::CcittFalse,
            ChecksumKind::Xmodem => Crc16::Xmodem,
        }
    }
}

/// Settings shared by every subcommand.
#[derive(Copy, Clone, Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub checksum: Crc16,
}

pub fn run(command: Command, ctx: Context) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, ctx),
        Command::Encode(args) => encode::run(args, ctx),
        Command::Monitor(args) => monitor::run(args, ctx),
        Command::Send(args) => send::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// KISS bytes as hex (whitespace ignored).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read KISS bytes from a file. Default: stdin.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Source station, CALL or CALL-SSID.
    #[arg(long)]
    pub source: String,
    /// Destination station, CALL or CALL-SSID.
    #[arg(long)]
    pub dest: String,
    /// Text payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Pad the information field with random printable ASCII to this length.
    #[arg(long, default_value = "0")]
    pub length: usize,
    /// TNC port (0-15).
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=15))]
    pub port: u8,
    /// Seed for the filler generator.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the framed bytes to stdout instead of a summary.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial device, e.g. /dev/ttyUSB0 or COM3.
    #[arg(env = "AX25KISS_PORT")]
    pub serial: String,
    /// Line speed.
    #[arg(long, env = "AX25KISS_BAUD", default_value = "57600")]
    pub baud: u32,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    /// Source station, CALL or CALL-SSID.
    #[arg(long)]
    pub source: String,
    /// Destination station, CALL or CALL-SSID.
    #[arg(long)]
    pub dest: String,
    /// Number of frames to send.
    #[arg(long, default_value = "1")]
    pub count: usize,
    /// Information field length of each frame.
    #[arg(long, default_value = "32")]
    pub length: usize,
    /// Delay between frames in milliseconds.
    #[arg(long, default_value = "1000")]
    pub interval: u64,
    /// TNC port (0-15).
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=15))]
    pub port: u8,
    /// Seed for the filler generator.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
