use std::path::Path;

use failure::{err_msg, format_err, Error, Fail, ResultExt};
use mgmesh::{
    io::{detect_format, ErrorKind, FileEncoding, FileFormat},
    Mesh,
};

use crate::{
    ui,
    util::{default_encoding, EncodingRequest},
};


pub mod convert;
pub mod info;
pub mod merge;


/// Tries to find the file format of the given file.
///
/// The explicitly specified format `file_format` is preferred. If that's not
/// set, the format is guessed from the filename. If that won't work, it's
/// guessed from the file start.
fn guess_file_format(file_format: Option<FileFormat>, filename: &str) -> Result<FileFormat, Error> {
    let e = match detect_format(Path::new(filename), file_format) {
        Ok(format) => return Ok(format),
        Err(e) => e,
    };

    if let ErrorKind::UnknownFormat(_) = e.kind() {
        return Err(err_msg(
            "couldn't determine source file format, please specify it explicitly using \
                '--source-format'"
        ));
    }

    Err(e.context(format!("failed to open '{}'", filename)).into())
}

/// Figures out the target format and encoding from the explicit arguments
/// and the target filename.
fn target_format_and_encoding(
    target_format: Option<FileFormat>,
    target_encoding: Option<EncodingRequest>,
    filename: &str,
) -> Result<(FileFormat, FileEncoding), Error> {
    let format = target_format
        .or_else(|| FileFormat::from_extension(filename))
        .ok_or_else(|| err_msg(
            "couldn't determine target file format, please specify it explicitly using \
                '--target-format'"
        ))?;

    let encoding = match target_encoding {
        None => default_encoding(format),
        Some(req) => req.encoding_for(format).ok_or_else(|| format_err!(
            "the encoding {:?} is not supported by the {} format",
            req,
            format,
        ))?,
    };

    Ok((format, encoding))
}

/// Prints the number of elements and the bounding box of the mesh.
fn print_mesh_info(mesh: &Mesh) {
    info!(
        "{} vertices, {} faces",
        ui::fmt_with_thousand_sep(mesh.num_vertices() as u64),
        ui::fmt_with_thousand_sep(mesh.num_faces() as u64),
    );

    if let Some(bb) = mesh.bounding_box() {
        info!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            bb.min.x, bb.min.y, bb.min.z,
            bb.max.x, bb.max.y, bb.max.z,
        );
    }
}

/// Reads the given file while showing progress.
fn load_file(filename: &str, format: Option<FileFormat>) -> Result<Mesh, Error> {
    let format = guess_file_format(format, filename)?;
    let mesh = ui::progress(format!("Reading {} file '{}'", format, filename), || {
        mgmesh::io::read_file(filename, Some(format), &mut ui::UiReporter)
    }).context(format!("could not read '{}'", filename))?;

    Ok(mesh)
}
