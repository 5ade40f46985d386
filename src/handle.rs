//! Strongly typed indices into the vertex and face lists of a [`Mesh`].
//!
//! [`Mesh`]: crate::Mesh

use std::fmt;

use derive_more::{From, Into};


/// The integer type used to store vertex and face indices.
///
/// Every binary format in this crate stores indices as 32 bit integers, so
/// there is no point in using anything larger.
pub type DefaultIndex = u32;

macro_rules! make_index_type {
    ($(#[$attr:meta])* $name:ident, $short:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
        pub struct $name(DefaultIndex);

        impl $name {
            /// Creates an index from the raw integer value.
            pub fn new(idx: DefaultIndex) -> Self {
                $name(idx)
            }

            /// Creates an index from a `usize`. Panics if `raw` does not fit
            /// into [`DefaultIndex`].
            pub fn from_usize(raw: usize) -> Self {
                assert!(
                    raw <= DefaultIndex::max_value() as usize,
                    "index {} does not fit into a 32 bit mesh index",
                    raw,
                );
                $name(raw as DefaultIndex)
            }

            /// Returns the raw integer value.
            pub fn idx(self) -> DefaultIndex {
                self.0
            }

            /// Returns the raw value as `usize`, suitable for indexing slices.
            pub fn to_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str($short)?;
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    }
}

make_index_type!(
    /// Index of a vertex. Equals the insertion order of the vertex.
    VertexIndex, "V"
);
make_index_type!(
    /// Index of a face. Equals the insertion order of the face.
    FaceIndex, "F"
);
