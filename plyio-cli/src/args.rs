//! Defines `Args` which is used to parse command line arguments.

use std::{
    path::PathBuf,
    str::FromStr,
};

use log::LevelFilter;
use plyio::Format;
use structopt::StructOpt;


#[derive(StructOpt, Debug)]
#[structopt(setting = structopt::clap::AppSettings::VersionlessSubcommands)]
pub struct Args {
    #[structopt(flatten)]
    pub global: GlobalArgs,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub struct GlobalArgs {
    /// Print more log messages of the PLY library. Can be given up to three
    /// times. `RUST_LOG` overrides this.
    #[structopt(short, long, parse(from_occurrences), global = true)]
    pub verbose: u8,
}

impl GlobalArgs {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Print the header of a PLY file: format, comments, elements and their
    /// properties.
    #[structopt(name = "info")]
    Info {
        #[structopt(flatten)]
        args: InfoArgs,
    },

    /// Rewrites a PLY file with another encoding. All elements, properties,
    /// comments and obj_info lines are kept.
    #[structopt(name = "convert")]
    Convert {
        #[structopt(flatten)]
        args: ConvertArgs,
    },
}

#[derive(StructOpt, Debug)]
pub struct InfoArgs {
    /// If specified, the body of the file is read completely, which checks
    /// that all element data is valid. By default, only the header is read.
    #[structopt(long = "read-body")]
    pub read_body: bool,

    /// Path to the PLY file.
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,
}

#[derive(StructOpt, Debug)]
pub struct ConvertArgs {
    /// Specify the target file encoding. Valid values: 'binary' (native
    /// endianess), 'bbe' (binary big endian), 'ble' (binary little endian) and
    /// 'ascii'.
    #[structopt(short = "e", long = "encoding", default_value = "binary")]
    pub encoding: EncodingRequest,

    /// Overwrite the target file if it already exists.
    #[structopt(short = "f", long = "force")]
    pub force: bool,

    /// If set, the header of the source file won't be printed.
    #[structopt(long = "no-info")]
    pub no_info: bool,

    /// Path to the source PLY file.
    #[structopt(parse(from_os_str))]
    pub source: PathBuf,

    /// Path to the target PLY file. Files are not overwritten by default.
    #[structopt(parse(from_os_str))]
    pub target: PathBuf,
}

/// The encoding requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingRequest {
    Ascii,
    Binary,
    BinaryBigEndian,
    BinaryLittleEndian,
}

impl EncodingRequest {
    pub fn format(&self) -> Format {
        match self {
            EncodingRequest::Ascii => Format::Ascii,
            EncodingRequest::Binary => Format::binary_native(),
            EncodingRequest::BinaryBigEndian => Format::BinaryBigEndian,
            EncodingRequest::BinaryLittleEndian => Format::BinaryLittleEndian,
        }
    }
}

impl FromStr for EncodingRequest {
    type Err = String;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "ascii" => Ok(EncodingRequest::Ascii),
            "binary" => Ok(EncodingRequest::Binary),
            "bbe" => Ok(EncodingRequest::BinaryBigEndian),
            "ble" => Ok(EncodingRequest::BinaryLittleEndian),
            other => Err(format!("'{}' is not a valid encoding", other)),
        }
    }
}
