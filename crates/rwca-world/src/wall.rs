//! Static polygonal walls and their boundary topology.
//!
//! # Representation
//!
//! A [`Wall`] keeps the caller's ordered point list and the id of its head
//! vertex.  The boundary itself is a circular doubly linked chain of
//! [`WallVertex`] nodes living in the world's vertex store; links are
//! [`WallVertexId`] handles, not references, so removing a wall can never
//! leave a dangling pointer behind, only a dead id.
//!
//! ```text
//!   head ──next──▶ head+1 ──next──▶ … ──next──▶ head+n-1
//!    ▲                                              │
//!    └────────────────────── next ──────────────────┘
//! ```
//!
//! The vertices of a wall with `n` points own the contiguous id range
//! `head .. head + n`.
//!
//! # Annotations
//!
//! Each node carries the unit direction of its outgoing edge and whether it
//! is convex.  A vertex is convex when `left_of(prev, this, next) >= 0`,
//! i.e. a counter-clockwise polygon has convex corners and its concave
//! notches are reflex.  A two-point wall is a bare segment and both ends are
//! convex.

use rwca_core::{EntityKey, Vec3, WallId, WallVertexId, WorldError, WorldResult, left_of, unit_between};

use crate::store::EntityStore;

/// One boundary node of a wall.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallVertex {
    pub id: WallVertexId,
    /// Owning wall.
    pub wall: WallId,
    pub point: Vec3,
    /// Unit direction from `point` to the next vertex's point.
    pub unit_dir: Vec3,
    pub is_convex: bool,
    pub prev: WallVertexId,
    pub next: WallVertexId,
}

/// A closed polygon.  The last point connects back to the first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall {
    pub id: WallId,
    pub head: WallVertexId,
    pub vertices: Vec<Vec3>,
}

impl Wall {
    /// Number of boundary vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false` for walls built by the world (they need ≥ 2 points).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// `true` for a two-point wall.
    #[inline]
    pub fn is_segment(&self) -> bool {
        self.vertices.len() == 2
    }

    /// The ids `head .. head + len` owned by this wall.
    pub fn vertex_ids(&self) -> impl Iterator<Item = WallVertexId> + '_ {
        let start = self.head.0;
        (start..start + self.vertices.len() as u32).map(WallVertexId)
    }
}

/// Build the boundary chain for a wall whose first vertex gets id `head`.
///
/// Pure: nothing is inserted anywhere.  Node `i` gets id `head + i`, links
/// to `head + (i ± 1 mod n)`, the unit direction of edge `i → i+1 mod n`, and
/// its convexity flag.
///
/// # Errors
///
/// [`WorldError::TooFewWallVertices`] for fewer than 2 points;
/// [`WorldError::IdSpaceExhausted`] if the id range would overflow.
pub fn build_chain(wall: WallId, head: WallVertexId, points: &[Vec3]) -> WorldResult<Vec<WallVertex>> {
    let n = points.len();
    if n < 2 {
        return Err(WorldError::TooFewWallVertices { got: n });
    }
    u32::try_from(n - 1)
        .ok()
        .and_then(|last| head.offset(last))
        .ok_or(WorldError::IdSpaceExhausted(WallVertexId::KIND))?;

    let id_at = |i: usize| WallVertexId(head.0 + i as u32);

    let chain = (0..n)
        .map(|i| {
            let prev = if i == 0 { n - 1 } else { i - 1 };
            let next = if i == n - 1 { 0 } else { i + 1 };
            let is_convex = n == 2 || left_of(points[prev], points[i], points[next]) >= 0.0;
            WallVertex {
                id: id_at(i),
                wall,
                point: points[i],
                unit_dir: unit_between(points[i], points[next]),
                is_convex,
                prev: id_at(prev),
                next: id_at(next),
            }
        })
        .collect();

    Ok(chain)
}

// ── Chain traversal ───────────────────────────────────────────────────────────

/// Walks a wall's boundary from its head by following `next` links.
///
/// Yields at most `len` vertices and stops early if a link points at a
/// vertex that no longer exists.
pub struct WallChain<'a> {
    vertices:  &'a EntityStore<WallVertexId, WallVertex>,
    cursor:    Option<WallVertexId>,
    remaining: usize,
}

impl<'a> WallChain<'a> {
    pub(crate) fn new(vertices: &'a EntityStore<WallVertexId, WallVertex>, wall: &Wall) -> Self {
        Self {
            vertices,
            cursor: Some(wall.head),
            remaining: wall.len(),
        }
    }
}

impl<'a> Iterator for WallChain<'a> {
    type Item = &'a WallVertex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let vertex = self.vertices.get(self.cursor?)?;
        self.remaining -= 1;
        self.cursor = Some(vertex.next);
        Some(vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
