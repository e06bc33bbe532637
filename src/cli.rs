//! `clap`-derived configuration surface (§6.1). This is the one and only
//! place `clap` is visible; everything downstream talks to `job::PrintOptions`.

use crate::job::PrintOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ptcbp")]
#[command(about = "Codec for the PTCBP-style raster command protocol")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and append a print job's command stream to an output file
    Print(PrintArgs),
    /// Append a status-request command to an output file
    Status(StatusArgs),
    /// Append the 202-byte initialise command to an output file
    Initialise(InitialiseArgs),
    /// Decode a captured command stream and print one line per command
    Parse(ParseArgs),
    /// Decode a captured 32-byte status reply
    ReadStatus(ReadStatusArgs),
}

#[derive(clap::Args)]
pub struct PrintArgs {
    /// Input PNG image (repeatable); pass the literal value `test` to
    /// emit the synthetic test pattern instead of decoding a file
    #[arg(short = 'i', long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Output byte sink, opened append-binary
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Number of copies of each input image
    #[arg(long = "copies")]
    pub copies: u32,

    /// Compression mode for the raster payload
    #[arg(long = "compression", value_enum)]
    pub compression: Compression,

    /// Tape type label, forwarded to `TapeGeometry::resolve`
    #[arg(long = "tape-type")]
    pub tape_type: String,

    /// Tape width id (e.g. "12 mm", "HS 11.7 mm")
    #[arg(long = "tape-width")]
    pub tape_width: String,

    /// Length margin, in dots
    #[arg(long = "set-length-margin")]
    pub set_length_margin: u16,

    #[arg(long = "no-auto-cut")]
    pub no_auto_cut: bool,

    #[arg(long = "no-half-cut")]
    pub no_half_cut: bool,

    #[arg(long = "chain-printing")]
    pub chain_printing: bool,

    #[arg(long = "mirror-printing")]
    pub mirror_printing: bool,

    #[arg(long = "scale-down")]
    pub scale_down: bool,

    #[arg(long = "scale-up")]
    pub scale_up: bool,

    #[arg(long = "center")]
    pub center: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Compression {
    #[value(name = "no compression")]
    None,
    Tiff,
}

impl PrintArgs {
    /// The tape id geometry is resolved against (`--tape-width` is the
    /// geometry catalog key; `--tape-type` is carried through for logging
    /// and future device-specific dispatch but does not affect geometry).
    pub fn tape_id(&self) -> &str {
        &self.tape_width
    }

    pub fn to_print_options(&self) -> PrintOptions {
        PrintOptions {
            tape_id: self.tape_id().to_string(),
            compressed: matches!(self.compression, Compression::Tiff),
            margin_dots: self.set_length_margin,
            no_auto_cut: self.no_auto_cut,
            no_half_cut: self.no_half_cut,
            chain_printing: self.chain_printing,
            mirror_printing: self.mirror_printing,
            scale_down: self.scale_down,
            scale_up: self.scale_up,
            center: self.center,
            copies: self.copies,
        }
    }
}

#[derive(clap::Args)]
pub struct StatusArgs {
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct InitialiseArgs {
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct ParseArgs {
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(clap::Args)]
pub struct ReadStatusArgs {
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}
