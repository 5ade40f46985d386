use std::path::Path;

use failure::{Error, ResultExt};
use mgmesh::io::{self, batch::{load_all, LoadOptions}};

use crate::{
    args::{GlobalArgs, MergeArgs},
    commands::{print_mesh_info, target_format_and_encoding},
    ui,
};

pub fn run(global_args: &GlobalArgs, args: &MergeArgs) -> Result<(), Error> {
    let (format, encoding) = target_format_and_encoding(None, args.target_encoding, &args.target)?;

    let target = Path::new(&args.target);
    let name = target.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(io::stl::DEFAULT_SOLID_NAME);
    let options = LoadOptions {
        format: args.source_format,
        merge: true,
        merge_name: name.to_owned(),
    };

    let label = format!("Loading {} files", args.sources.len());
    let mut meshes = ui::progress(label, || {
        load_all(&args.sources[..], &options, &mut ui::UiReporter)
    }).context("could not load source files")?;

    // `merge` is set, so there is exactly one mesh.
    let merged = match meshes.pop() {
        Some(m) => m.mesh,
        None => return Ok(()),
    };

    if global_args.verbose {
        info!("Merged mesh:");
        print_mesh_info(&merged);
    }

    let writer = io::writer_for(format, encoding, name)?;
    ui::progress(format!("Writing merged mesh to '{}'", args.target), || {
        writer.write_to_file(&merged, target, &mut ui::UiReporter)
    }).context("could not write target file")?;

    Ok(())
}
