use std::convert::TryFrom;

use cgmath::{prelude::*, Point3};

use crate::{
    handle::VertexIndex,
    io::{ErrorKind, FileEncoding, FileFormat, MeshWriter},
    report::LogReporter,
    test_utils::{decode_binary_stl, single_triangle, strip, tetrahedron, RecordingReporter},
    Mesh,
};
use super::{write, writer_for, Config, Encoding, BINARY_HEADER_LEN};


fn write_binary(mesh: &Mesh, name: &str) -> Vec<u8> {
    Config::binary()
        .with_solid_name(name)
        .write_to_memory(mesh, &mut LogReporter)
        .unwrap()
}

// ===========================================================================
// ===== Binary
// ===========================================================================

#[test]
fn binary_single_triangle() {
    let data = write_binary(&single_triangle(), "triangle");
    assert_eq!(data.len(), 84 + 50);

    let (header, triangles) = decode_binary_stl(&data);
    assert!(header.starts_with(b"Generated by mgmesh: triangle "));
    assert_eq!(triangles.len(), 1);
    assert_eq!(triangles[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(triangles[0].vertices, [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    assert_eq!(triangles[0].attribute_byte_count, 0);
}

#[test]
fn binary_header_is_always_80_bytes() {
    let mesh = single_triangle();
    let long = "x".repeat(200);
    let exact = "y".repeat(80);

    for name in &["", exact.as_str(), long.as_str()] {
        let data = write_binary(&mesh, name);
        assert_eq!(data.len(), BINARY_HEADER_LEN + 4 + 50, "name length {}", name.len());
        assert_eq!(&data[80..84], &[1, 0, 0, 0]);

        let expected = format!("Generated by mgmesh: {}", name);
        let (header, _) = decode_binary_stl(&data);
        if expected.len() >= BINARY_HEADER_LEN {
            assert_eq!(&header[..], &expected.as_bytes()[..BINARY_HEADER_LEN]);
        } else {
            assert_eq!(&header[..expected.len()], expected.as_bytes());
            assert!(header[expected.len()..].iter().all(|&b| b == b' '));
        }
    }
}

#[test]
fn binary_round_trip() {
    let mesh = tetrahedron();
    let data = write_binary(&mesh, "tetra");
    let (_, triangles) = decode_binary_stl(&data);

    assert_eq!(triangles.len(), mesh.num_faces());
    for (f, triangle) in mesh.face_indices().zip(&triangles) {
        let expected = mesh.face_triangle(f);
        for (p, actual) in expected.iter().zip(&triangle.vertices) {
            assert_eq!([p.x as f32, p.y as f32, p.z as f32], *actual);
        }

        let [x, y, z] = triangle.normal;
        assert_close!((x * x + y * y + z * z).sqrt(), 1.0);
    }
}

#[test]
fn normals_reflect_moved_vertices() {
    let mut mesh = single_triangle();
    mesh.set_vertex(VertexIndex::new(2), Point3::new(0.0, 0.0, 1.0));

    let (_, triangles) = decode_binary_stl(&write_binary(&mesh, "moved"));
    assert_eq!(triangles[0].normal, [0.0, -1.0, 0.0]);
}

#[test]
fn non_ascii_name_is_replaced() {
    let data = write_binary(&single_triangle(), "kö");
    assert!(data.starts_with(b"Generated by mgmesh: k? "));
}

// ===========================================================================
// ===== ASCII
// ===========================================================================

#[test]
fn ascii_single_triangle() {
    let data = Config::ascii()
        .with_solid_name("triangle")
        .write_to_memory(&single_triangle(), &mut LogReporter)
        .unwrap();

    assert_eq_file!(&data, "triangle_ascii.stl");
}

#[test]
fn ascii_precision_is_configurable() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point3::new(0.5, -1.0, 2.0));
    let b = mesh.add_vertex(Point3::new(1.0 / 3.0, 0.0, 2.0));
    let c = mesh.add_vertex(Point3::new(0.0, 1.0, 2.0));
    mesh.add_face([a, b, c]);

    let data = Config::ascii()
        .with_precision(2)
        .write_to_memory(&mesh, &mut LogReporter)
        .unwrap();
    let s = String::from_utf8(data).unwrap();

    assert!(s.starts_with("solid mesh\n"));
    assert!(s.contains("\n      vertex 0.50 -1.00 2.00\n"));
    assert!(s.contains("\n      vertex 0.33 0.00 2.00\n"));
    assert!(s.ends_with("endsolid mesh\n"));
    assert_eq!(s.matches("facet normal").count(), 1);
}

#[test]
fn ascii_one_block_per_face() {
    let mesh = tetrahedron();
    let data = Config::ascii().write_to_memory(&mesh, &mut LogReporter).unwrap();
    let s = String::from_utf8(data).unwrap();

    assert_eq!(s.matches("  facet normal ").count(), 4);
    assert_eq!(s.matches("      vertex ").count(), 12);
    assert_eq!(s.matches("  endfacet\n").count(), 4);
}

// ===========================================================================
// ===== Failures
// ===========================================================================

#[test]
fn cancellation_stops_after_k_triangles() {
    let mesh = strip(10);
    let mut reporter = RecordingReporter::cancel_after(4);
    let mut out = Vec::new();

    let err = write(&mesh, &Config::binary(), &mut out, &mut reporter).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(out.len(), 84 + 4 * 50);
    assert_eq!(reporter.bounds, Some((0, 10)));
    assert_eq!(reporter.updates, vec![1, 2, 3, 4]);
    assert_eq!(reporter.warnings, vec!["STL: operation cancelled by user".to_string()]);
    assert!(reporter.errors.is_empty());
}

#[test]
fn cancellation_in_ascii_mode() {
    let mesh = strip(3);
    let mut reporter = RecordingReporter::cancel_after(1);
    let mut out = Vec::new();

    let err = write(&mesh, &Config::ascii(), &mut out, &mut reporter).unwrap_err();

    assert!(err.is_cancelled());
    let s = String::from_utf8(out).unwrap();
    assert_eq!(s.matches("endfacet").count(), 1);
    assert!(!s.contains("endsolid"));
}

#[test]
fn invalid_mesh_writes_nothing() {
    let mut mesh = single_triangle();
    mesh.add_face([VertexIndex::new(0), VertexIndex::new(1), VertexIndex::new(7)]);

    let mut reporter = RecordingReporter::new();
    let mut out = Vec::new();
    let err = write(&mesh, &Config::binary(), &mut out, &mut reporter).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::InvalidMesh(_)));
    assert!(out.is_empty());
    assert_eq!(reporter.errors.len(), 1);
    assert!(reporter.errors[0].starts_with("STL: invalid mesh"));
}

#[test]
fn failed_write_to_memory_is_logged() {
    let mut mesh = single_triangle();
    mesh.add_face([VertexIndex::new(0), VertexIndex::new(1), VertexIndex::new(9)]);

    let mut reporter = RecordingReporter::new();
    let err = Config::binary().write_to_memory(&mesh, &mut reporter).unwrap_err();

    assert_eq!(err.format(), Some(FileFormat::Stl));
    assert_eq!(reporter.errors.len(), 1);
    assert!(reporter.errors[0].starts_with("STL: "));
    assert_eq!(reporter.errors[0], err.to_string());
}

#[test]
fn empty_mesh() {
    let data = write_binary(&Mesh::new(), "empty");
    assert_eq!(data.len(), 84);
    assert_eq!(&data[80..], &[0, 0, 0, 0]);
}

#[test]
fn encodings() {
    assert_eq!(Encoding::try_from(FileEncoding::Ascii).unwrap(), Encoding::Ascii);
    assert_eq!(Encoding::try_from(FileEncoding::BinaryLittleEndian).unwrap(), Encoding::Binary);
    assert_eq!(FileEncoding::from(Encoding::Binary), FileEncoding::BinaryLittleEndian);

    let err = writer_for(FileEncoding::BinaryBigEndian, "x").err().unwrap();
    assert!(matches!(err.kind(), ErrorKind::UnsupportedEncoding(FileEncoding::BinaryBigEndian)));
    assert_eq!(err.to_string(), "STL: big endian binary encoding is not supported");
}

#[test]
fn normal_is_unit_length() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let b = mesh.add_vertex(Point3::new(3.0, 0.0, 0.0));
    let c = mesh.add_vertex(Point3::new(0.0, 0.0, 5.0));
    mesh.add_face([a, b, c]);

    let (_, triangles) = decode_binary_stl(&write_binary(&mesh, "big"));
    let n = cgmath::Vector3::from(triangles[0].normal);
    assert_close!(n.magnitude(), 1.0);
    assert_eq!(triangles[0].normal, [0.0, -1.0, 0.0]);
}
