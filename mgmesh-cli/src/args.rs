//! Defines `Args` which is used to parse command line arguments.

use structopt::{clap::AppSettings, StructOpt};
use mgmesh::io::FileFormat;

use crate::util::EncodingRequest;


#[derive(StructOpt, Debug)]
#[structopt(name = "mgmesh", setting = AppSettings::VersionlessSubcommands)]
pub struct Args {
    #[structopt(flatten)]
    pub global: GlobalArgs,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub struct GlobalArgs {
    /// Print additional details, like the complete header of Duff files.
    #[structopt(short, long, global = true)]
    pub verbose: bool,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Print information about a mesh file.
    #[structopt(name = "info")]
    Info {
        #[structopt(flatten)]
        args: InfoArgs,
    },

    /// Converts a mesh from one file format into another one.
    #[structopt(name = "convert")]
    Convert {
        #[structopt(flatten)]
        args: ConvertArgs,
    },

    /// Loads several mesh files and writes them as one merged mesh.
    #[structopt(name = "merge")]
    Merge {
        #[structopt(flatten)]
        args: MergeArgs,
    },
}

#[derive(StructOpt, Debug)]
pub struct ConvertArgs {
    /// Explicitly specify the source file format (otherwise it's guessed from
    /// the extension and file header). Valid values: stl, obj, duff.
    #[structopt(long, parse(try_from_str = parse_file_format))]
    pub source_format: Option<FileFormat>,

    /// Explicitly specify the target file format (otherwise it's guessed from
    /// the extension). Valid values: stl, obj, duff.
    #[structopt(short = "f", long, parse(try_from_str = parse_file_format))]
    pub target_format: Option<FileFormat>,

    /// Specify the target file encoding. Valid values: 'binary' (native
    /// endianess where the format allows it), 'bbe' (binary big endian),
    /// 'ble' (binary little endian) and 'ascii'. If not specified, the
    /// default encoding of the target format is used.
    #[structopt(short = "e", long)]
    pub target_encoding: Option<EncodingRequest>,

    /// Solid name for STL files. Defaults to the target file stem.
    #[structopt(long)]
    pub name: Option<String>,

    /// Path to the source mesh file.
    pub source: String,

    /// Path to the target mesh file. The target format is guessed from the
    /// extension given here. An existing file is overwritten.
    pub target: String,

    /// If set, information about the source mesh won't be printed.
    #[structopt(long)]
    pub no_info: bool,
}

#[derive(StructOpt, Debug)]
pub struct InfoArgs {
    /// Explicitly specify the source file format (otherwise it's guessed from
    /// the extension and file header). Valid values: stl, obj, duff.
    #[structopt(long, parse(try_from_str = parse_file_format))]
    pub source_format: Option<FileFormat>,

    /// If specified, only the header (and not the body) of the file will be
    /// read. Only Duff files have a header that can be inspected this way.
    #[structopt(long)]
    pub header_only: bool,

    /// Path to the mesh file.
    pub file: String,
}

#[derive(StructOpt, Debug)]
pub struct MergeArgs {
    /// Explicitly specify the format of all source files. Valid values: stl,
    /// obj, duff.
    #[structopt(long, parse(try_from_str = parse_file_format))]
    pub source_format: Option<FileFormat>,

    /// Specify the target file encoding. Same values as for `convert`.
    #[structopt(short = "e", long)]
    pub target_encoding: Option<EncodingRequest>,

    /// Path to the target mesh file. The target format is guessed from the
    /// extension.
    pub target: String,

    /// The files to merge, in this order.
    #[structopt(required = true)]
    pub sources: Vec<String>,
}

fn parse_file_format(src: &str) -> Result<FileFormat, String> {
    match src {
        "stl" => Ok(FileFormat::Stl),
        "obj" => Ok(FileFormat::Obj),
        "duff" | "dfs" => Ok(FileFormat::Duff),
        other => Err(format!("'{}' is currently not an accepted file format", other)),
    }
}
