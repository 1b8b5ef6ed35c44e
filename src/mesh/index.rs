//! Index types for mesh elements.
//!
//! Vertices, corners and triangles are addressed by type-safe index wrappers.
//! The indices are generic over the underlying integer type so that small
//! meshes can use `u16`, typical meshes `u32`, and massive meshes `u64`.
//!
//! Corners follow the usual corner-table numbering: corner `c` belongs to
//! triangle `c / 3`, and the corners of triangle `t` are `3t`, `3t + 1` and
//! `3t + 2` in the order the triangle lists its vertices.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
///
/// This trait is implemented for `u16`, `u32`, and `u64`.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// A sentinel value representing an invalid/null index.
    const INVALID: Self;

    /// Convert from usize to this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe corner index (one per triangle-vertex incidence).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CornerId<I: MeshIndex = u32>(I);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(CornerId, "C");
impl_index_type!(TriangleId, "T");

impl<I: MeshIndex> CornerId<I> {
    /// The triangle this corner belongs to.
    #[inline]
    pub fn triangle(self) -> TriangleId<I> {
        TriangleId::new(self.index() / 3)
    }

    /// Position of this corner inside its triangle (0, 1 or 2).
    #[inline]
    pub fn local(self) -> usize {
        self.index() % 3
    }

    /// The next corner counter-clockwise in the same triangle.
    #[inline]
    pub fn next(self) -> Self {
        let c = self.index();
        Self::new(3 * (c / 3) + (c + 1) % 3)
    }

    /// The previous corner in the same triangle.
    #[inline]
    pub fn prev(self) -> Self {
        let c = self.index();
        Self::new(3 * (c / 3) + (c + 2) % 3)
    }
}

impl<I: MeshIndex> TriangleId<I> {
    /// The `k`-th corner of this triangle, `k` in `0..3`.
    #[inline]
    pub fn corner(self, k: usize) -> CornerId<I> {
        debug_assert!(k < 3, "corner slot {} out of range", k);
        CornerId::new(3 * self.index() + k)
    }

    /// All three corners of this triangle.
    #[inline]
    pub fn corners(self) -> [CornerId<I>; 3] {
        [self.corner(0), self.corner(1), self.corner(2)]
    }
}
