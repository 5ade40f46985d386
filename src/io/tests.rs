use std::{fs, io};

use crate::{
    report::LogReporter,
    test_utils::{strip, tetrahedron, RecordingReporter},
};
use super::{
    detect_format, read_file, write_file, writer_for,
    duff, obj, stl,
    Error, ErrorKind, FileEncoding, FileFormat, MeshWriter,
};

#[test]
fn from_extension() {
    macro_rules! check_for_format {
        ($lower:literal $upper:literal $mixed:literal => $variant:ident) => {{
            let exp = Some(FileFormat::$variant);
            assert_eq!(FileFormat::from_extension(concat!("foo.", $lower)), exp);
            assert_eq!(FileFormat::from_extension(concat!("foo.", $upper)), exp);
            assert_eq!(FileFormat::from_extension(concat!("foo.", $mixed)), exp);
            assert_eq!(FileFormat::from_extension(concat!("föö.", $lower)), exp);
            assert_eq!(FileFormat::from_extension(concat!("/bar/foo.", $lower)), exp);
        }}
    }

    check_for_format!("stl" "STL" "sTl" => Stl);
    check_for_format!("obj" "OBJ" "oBj" => Obj);
    check_for_format!("dfs" "DFS" "dFs" => Duff);
    check_for_format!("duff" "DUFF" "dUfF" => Duff);
}

#[test]
fn from_extension_none() {
    assert_eq!(FileFormat::from_extension("foo/bar/"), None);
    assert_eq!(FileFormat::from_extension("foo/bar"), None);
    assert_eq!(FileFormat::from_extension("foo/bar."), None);
    assert_eq!(FileFormat::from_extension("foo/.bar"), None);
    assert_eq!(FileFormat::from_extension("foo/bröther"), None);
    assert_eq!(FileFormat::from_extension("foo/bar.ply"), None);
}

#[test]
fn extension() {
    assert_eq!(FileFormat::Stl.extension(), "stl");
    assert_eq!(FileFormat::Obj.extension(), "obj");
    assert_eq!(FileFormat::Duff.extension(), "dfs");

    for &format in &[FileFormat::Stl, FileFormat::Obj, FileFormat::Duff] {
        assert_eq!(FileFormat::from_extension(format!("x.{}", format.extension())), Some(format));
    }
}

#[test]
fn from_file_start() {
    assert_eq!(FileFormat::from_file_start(b"DUFFSURF\0\0\0\x01"), Some(FileFormat::Duff));
    assert_eq!(FileFormat::from_file_start(b"FRUSFFUD\x01\0\0\0"), Some(FileFormat::Duff));
    assert_eq!(FileFormat::from_file_start(b"solid cube\n  facet"), Some(FileFormat::Stl));
    assert_eq!(FileFormat::from_file_start(b"\n# comment\nv 1 2 3\n"), Some(FileFormat::Obj));
    assert_eq!(FileFormat::from_file_start(b"v 1 2 3\n"), Some(FileFormat::Obj));
    assert_eq!(FileFormat::from_file_start(b"FRUSXXXX"), None);
    assert_eq!(FileFormat::from_file_start(b"\x00\x01\x02"), None);
    assert_eq!(FileFormat::from_file_start(b""), None);
}

#[test]
fn capabilities() {
    assert!(FileFormat::Duff.can_read());
    assert!(FileFormat::Duff.can_write());
    assert!(FileFormat::Obj.can_read());
    assert!(FileFormat::Obj.can_write());
    assert!(!FileFormat::Stl.can_read());
    assert!(FileFormat::Stl.can_write());
}

#[test]
fn error_display() {
    let e = Error::new(ErrorKind::UnexpectedEof);
    assert_eq!(e.to_string(), "unexpected end of data");
    assert!(e.is_io());

    let e = e.in_format(FileFormat::Duff).in_format(FileFormat::Stl);
    assert_eq!(e.format(), Some(FileFormat::Duff));
    assert_eq!(e.to_string(), "Duff: unexpected end of data");

    let e = Error::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
    assert!(matches!(e.kind(), ErrorKind::UnexpectedEof));

    let e = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert!(matches!(e.kind(), ErrorKind::Io(_)));
    assert!(!e.is_cancelled());
    assert!(Error::new(ErrorKind::Cancelled).is_cancelled());
}

#[test]
fn writer_registry() {
    assert_eq!(writer_for(FileFormat::Stl, FileEncoding::Ascii, "x").unwrap().format(), FileFormat::Stl);
    assert_eq!(writer_for(FileFormat::Obj, FileEncoding::Ascii, "x").unwrap().format(), FileFormat::Obj);
    assert_eq!(
        writer_for(FileFormat::Duff, FileEncoding::BinaryLittleEndian, "x").unwrap().format(),
        FileFormat::Duff,
    );

    let err = writer_for(FileFormat::Duff, FileEncoding::Ascii, "x").err().unwrap();
    assert_eq!(err.to_string(), "Duff: ASCII encoding is not supported");
}

#[test]
fn file_round_trip_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = tetrahedron();

    for &(name, encoding) in &[
        ("a.obj", FileEncoding::Ascii),
        ("b.dfs", FileEncoding::BinaryLittleEndian),
        ("c.dfs", FileEncoding::BinaryBigEndian),
    ] {
        let path = dir.path().join(name);
        write_file(&mesh, &path, None, encoding, &mut LogReporter).unwrap();
        let read = read_file(&path, None, &mut LogReporter).unwrap();
        assert_eq!(read, mesh, "{}", name);
    }
}

#[test]
fn stl_solid_name_is_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gear.stl");
    write_file(&tetrahedron(), &path, None, FileEncoding::Ascii, &mut LogReporter).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("solid gear\n"));
    assert!(content.ends_with("endsolid gear\n"));
}

#[test]
fn reading_stl_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.stl");
    write_file(&tetrahedron(), &path, None, FileEncoding::BinaryLittleEndian, &mut LogReporter).unwrap();

    let mut reporter = RecordingReporter::new();
    let err = read_file(&path, None, &mut reporter).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownFormat(_)));
    assert_eq!(reporter.errors, vec![err.to_string()]);
}

#[test]
fn detect_format_from_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_extension");
    duff::Config::little_endian().write_to_file(&tetrahedron(), &path, &mut LogReporter).unwrap();

    assert_eq!(detect_format(&path, None).unwrap(), FileFormat::Duff);
    assert_eq!(detect_format(&path, Some(FileFormat::Obj)).unwrap(), FileFormat::Obj);
    assert_eq!(read_file(&path, None, &mut LogReporter).unwrap(), tetrahedron());

    let unknown = dir.path().join("garbage");
    fs::write(&unknown, [0u8, 1, 2, 3]).unwrap();
    let err = detect_format(&unknown, None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownFormat(_)));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut reporter = RecordingReporter::new();
    let err = read_file(dir.path().join("nope.obj"), None, &mut reporter).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::Io(_)));
    assert_eq!(err.format(), Some(FileFormat::Obj));
    assert_eq!(reporter.errors.len(), 1);
}

#[test]
fn write_to_file_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.obj");
    fs::write(&path, "old content that is longer than the new one, or is it?").unwrap();

    let config = obj::Config::new().with_comments(false);
    config.write_to_file(&tetrahedron(), &path, &mut LogReporter).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("v "));
    assert!(!content.contains("old content"));
}

#[test]
fn empty_path_is_an_error() {
    let mut reporter = RecordingReporter::new();
    let err = stl::Config::binary()
        .write_to_file(&tetrahedron(), "".as_ref(), &mut reporter)
        .unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::MissingPath));
    assert_eq!(reporter.errors, vec!["STL: no output file specified".to_string()]);
}

#[test]
fn cancelled_write_removes_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.stl");
    let mut reporter = RecordingReporter::cancel_after(3);

    let err = stl::Config::binary()
        .write_to_file(&strip(20), &path, &mut reporter)
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(!path.exists());
    assert_eq!(reporter.updates, vec![1, 2, 3]);
    assert_eq!(reporter.warnings, vec!["STL: operation cancelled by user".to_string()]);
}
