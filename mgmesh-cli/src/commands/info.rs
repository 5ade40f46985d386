use failure::{Error, ResultExt};
use term_painter::{Color, ToStyle};
use mgmesh::io::{duff, FileFormat};

use crate::{
    args::{GlobalArgs, InfoArgs},
    commands::{guess_file_format, load_file, print_mesh_info},
};


pub fn run(global_args: &GlobalArgs, args: &InfoArgs) -> Result<(), Error> {
    let filename = &args.file;
    let format = guess_file_format(args.source_format, filename)?;

    println!("File format: {}", Color::BrightWhite.bold().paint(format));

    if format == FileFormat::Duff {
        let header = duff::read_header(filename)
            .context(format!("failed to read {} header", format))?;
        print_duff_header(&header, global_args);
    } else if args.header_only {
        warn!("{} files have no header that could be inspected on its own", format);
        return Ok(());
    }

    if args.header_only {
        return Ok(());
    }

    println!();
    let mesh = load_file(filename, Some(format))?;
    print_mesh_info(&mesh);

    Ok(())
}

fn print_duff_header(header: &duff::Header, global_args: &GlobalArgs) {
    println!(
        "Encoding: {} endian, {} precision (version {})",
        Color::BrightWhite.paint(format!("{:?}", header.byte_order)),
        Color::BrightWhite.paint(format!("{:?}", header.precision)),
        header.version,
    );
    println!(
        "Header declares {} nodes and {} faces",
        Color::BrightWhite.bold().paint(header.n_nodes),
        Color::BrightWhite.bold().paint(header.n_faces),
    );

    if !header.has_identity_transform() {
        println!("{}", Color::Yellow.paint("Header contains a non-identity orientation matrix"));
    }

    if global_args.verbose {
        let rows = [
            ("header size", header.hdr_size),
            ("mesh data offset", header.md_offset),
            ("node data offset", header.pd_offset),
            ("strips", header.n_strips),
            ("strip size", header.strip_size),
            ("normals", header.normals),
            ("uv start", header.uv_start),
            ("vertex color offset", header.vc_offset),
        ];
        for (label, value) in &rows {
            println!("  {:<20} {}", label, Color::BrightWhite.paint(value));
        }

        println!("  orientation:");
        for row in header.orientation.chunks(4) {
            println!("    {:>10.4} {:>10.4} {:>10.4} {:>10.4}", row[0], row[1], row[2], row[3]);
        }
    }
}
