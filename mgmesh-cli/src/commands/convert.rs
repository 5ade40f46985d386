use std::{
    path::Path,
    time::Instant,
};

use failure::{Error, ResultExt};
use mgmesh::{
    io::{self, stl},
    Mesh,
};

use crate::{
    args::{ConvertArgs, GlobalArgs},
    commands::{load_file, print_mesh_info, target_format_and_encoding},
    ui,
};

pub fn run(_global_args: &GlobalArgs, args: &ConvertArgs) -> Result<(), Error> {
    let start_time = Instant::now();

    let before_load = Instant::now();
    let mesh = load_file(&args.source, args.source_format)
        .context("could not read source file")?;
    let load_time = before_load.elapsed();

    if !args.no_info {
        info!("Mesh information:");
        print_mesh_info(&mesh);
        println!();
    }

    let before_write = Instant::now();
    write_file(args, &mesh).context("could not write target file")?;
    let write_time = before_write.elapsed();

    info!(
        "Processing time: {:.2?} ({:.2?} loading, {:.2?} writing)",
        start_time.elapsed(),
        load_time,
        write_time,
    );

    Ok(())
}

fn write_file(args: &ConvertArgs, mesh: &Mesh) -> Result<(), Error> {
    let (format, encoding) = target_format_and_encoding(
        args.target_format,
        args.target_encoding,
        &args.target,
    )?;
    info!("Target format: {} ({} encoding)", format, encoding);

    let target = Path::new(&args.target);
    let name = match &args.name {
        Some(name) => name.as_str(),
        None => target.file_stem().and_then(|s| s.to_str()).unwrap_or(stl::DEFAULT_SOLID_NAME),
    };
    let writer = io::writer_for(format, encoding, name)?;

    ui::progress(format!("Writing mesh to '{}'", args.target), || {
        writer.write_to_file(mesh, target, &mut ui::UiReporter)
    })?;

    Ok(())
}
