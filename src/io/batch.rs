//! Loading several mesh files in one go.

use std::path::Path;

use crate::{
    io::{check_cancelled, read_file, Error, FileFormat},
    report::Reporter,
    Mesh,
};


/// Options for [`load_all`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Forces the format of all files. If `None`, the format of each file is
    /// detected separately.
    pub format: Option<FileFormat>,

    /// If `true`, all loaded meshes are merged into a single mesh.
    pub merge: bool,

    /// Name of the merged mesh.
    pub merge_name: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            merge: false,
            merge_name: "merged".into(),
        }
    }
}

/// A mesh together with a name, usually the file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMesh {
    pub name: String,
    pub mesh: Mesh,
}

/// Loads all given files, one after another, in the given order.
///
/// The first failing file aborts the whole operation. Cancellation is
/// checked between files (and by the format readers while reading). With
/// `options.merge`, the result consists of exactly one mesh.
pub fn load_all<P: AsRef<Path>>(
    paths: &[P],
    options: &LoadOptions,
    reporter: &mut dyn Reporter,
) -> Result<Vec<NamedMesh>, Error> {
    let mut out = Vec::with_capacity(paths.len());

    for path in paths {
        if let Err(e) = check_cancelled(reporter) {
            reporter.warn(&e.to_string());
            return Err(e);
        }

        let path = path.as_ref();
        let mesh = read_file(path, options.format, reporter)?;
        let name = path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(
            "loaded '{}': {} vertices, {} faces",
            name,
            mesh.num_vertices(),
            mesh.num_faces(),
        );
        out.push(NamedMesh { name, mesh });
    }

    if options.merge {
        let mesh = Mesh::merge(out.iter().map(|m| &m.mesh));
        return Ok(vec![NamedMesh { name: options.merge_name.clone(), mesh }]);
    }

    Ok(out)
}
