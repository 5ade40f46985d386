//! Indexed triangle meshes and codecs for the STL, OBJ and Duff surface
//! formats.
//!
//! The central type is [`Mesh`]: vertex positions plus faces that reference
//! them by index. Readers in [`io`] produce meshes, writers consume them.
//! Normals are never stored but computed by the functions in [`normals`]
//! whenever they are needed.
//!
//! Every codec call takes a [`Reporter`] which receives progress updates and
//! warnings and which can cancel the operation.
//!
//! ```
//! use cgmath::Point3;
//! use mgmesh::{io::{stl, MeshWriter}, report::LogReporter, Mesh};
//!
//! let mut mesh = Mesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
//! mesh.add_face([a, b, c]);
//!
//! let bytes = stl::Config::binary().write_to_memory(&mesh, &mut LogReporter).unwrap();
//! assert_eq!(bytes.len(), 84 + 50);
//! ```

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod handle;
pub mod io;
mod mesh;
pub mod normals;
pub mod report;

pub use self::{
    handle::{FaceIndex, VertexIndex},
    mesh::{BoundingBox, Face, Mesh, MeshError},
    report::Reporter,
};
