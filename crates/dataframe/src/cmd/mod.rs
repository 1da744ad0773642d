use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use dataframe_core::byteutil::hex_to_bytes;
use dataframe_core::DataFrame;

use crate::exit::{codec_error, io_error, CliError, CliResult, DATA_INVALID};
use crate::output::OutputFormat;

pub mod decode;
pub mod digest;
pub mod dump;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert JSON text to frame bytes.
    Encode(EncodeArgs),
    /// Convert frame bytes to JSON text.
    Decode(DecodeArgs),
    /// List the fields of a frame.
    Inspect(InputArgs),
    /// Print a boxed hex/binary/ASCII dump of the input bytes.
    Dump(DumpArgs),
    /// Print the SHA-256 digest of a frame.
    Digest(InputArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Dump(args) => dump::run(args),
        Command::Digest(args) => digest::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON file to read. Default: stdin.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
    /// File to write. Default: stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Write upper-case hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Frame file to read. Default: stdin.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
    /// Input is hex text rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Maximum number of bytes to render.
    #[arg(long, default_value_t = dataframe_core::CodecConfig::default().dump_limit)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read the whole input file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(data)
        }
    }
}

/// Input bytes, decoding hex text first when requested.
pub fn read_bytes(args: &InputArgs) -> CliResult<Vec<u8>> {
    let data = read_input(args.input.as_deref())?;
    if !args.hex {
        return Ok(data);
    }
    hex_to_bytes(&String::from_utf8_lossy(&data))
        .ok_or_else(|| CliError::new(DATA_INVALID, "input is not valid hex"))
}

pub fn read_frame(args: &InputArgs) -> CliResult<DataFrame> {
    let data = read_bytes(args)?;
    DataFrame::from_bytes(&data).map_err(|err| codec_error("decode failed", err))
}
