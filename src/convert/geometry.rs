use std::collections::HashMap;

use log::trace;
use nalgebra::Vector3;

use super::normals::NormalRegistry;
use crate::{
    error::ConvertError,
    scene_graph::{
        Binding, Coordinates, FACE_TERMINATOR, IndexedTriangleSet, Normal, Normals, Position,
        SceneNode,
    },
};

// ─── Exact vector keys ────────────────────────────────────────────────────────

/// Hashable identity of a float vector.
///
/// Components compare by bit pattern, except that both zeros map to the same
/// key so that `-0.0 == 0.0` holds as it does numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct VectorKey([u32; 3]);

impl From<&Vector3<f32>> for VectorKey {
    fn from(value: &Vector3<f32>) -> Self {
        Self([
            component_bits(value.x),
            component_bits(value.y),
            component_bits(value.z),
        ])
    }
}

fn component_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

// ─── Position deduplication ───────────────────────────────────────────────────

/// Unique positions of one primitive in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    points: Vec<Position>,
    indices: HashMap<VectorKey, usize>,
    /// Unique index for every raw vertex.
    vertex_map: Vec<usize>,
}

impl PositionTable {
    /// Deduplicate a raw vertex position stream in a single ordered pass.
    pub fn from_raw(raw: &[Position]) -> Self {
        let mut table = Self {
            vertex_map: Vec::with_capacity(raw.len()),
            ..Self::default()
        };

        for position in raw {
            let next = table.points.len();
            let index = *table.indices.entry(VectorKey::from(position)).or_insert(next);
            if index == next {
                table.points.push(*position);
            }
            table.vertex_map.push(index);
        }

        table
    }

    pub fn index_of(&self, position: &Position) -> Option<usize> {
        self.indices.get(&VectorKey::from(position)).copied()
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unique position index for each triangle corner.
    pub fn remap(&self, triangle_indices: &[u32]) -> Result<Vec<usize>, ConvertError> {
        triangle_indices
            .iter()
            .map(|&vertex| {
                self.vertex_map
                    .get(vertex as usize)
                    .copied()
                    .ok_or(ConvertError::IndexOutOfRange {
                        kind: "position",
                        index: vertex as i64,
                        len: self.vertex_map.len(),
                    })
            })
            .collect()
    }
}

// ─── Triangle assembly ────────────────────────────────────────────────────────

/// Geometry nodes produced for one triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
    pub coordinates: Coordinates,
    /// Normals this primitive added to the registry, in registry order.
    pub normals: Normals,
    pub triangles: IndexedTriangleSet,
}

impl TriangleGeometry {
    /// Output nodes in emission order, bindings included.
    pub fn into_nodes(self) -> [SceneNode; 5] {
        [
            SceneNode::Coordinates(self.coordinates),
            SceneNode::MaterialBinding(Binding::Overall),
            SceneNode::Normals(self.normals),
            SceneNode::NormalBinding(Binding::PerVertexIndexed),
            SceneNode::IndexedTriangleSet(self.triangles),
        ]
    }
}

/// Build indexed triangle geometry for one primitive.
///
/// `normals` runs parallel to `positions`; `indices` addresses both, three
/// entries per triangle. Normal indices are global to `registry`, while the
/// emitted [`Normals`](crate::scene_graph::Normals) node holds only the
/// normals this call registered; earlier ones live in earlier nodes.
pub fn assemble_triangles(
    positions: &[Position],
    normals: &[Normal],
    indices: &[u32],
    registry: &mut NormalRegistry,
) -> Result<TriangleGeometry, ConvertError> {
    if indices.len() % 3 != 0 {
        return Err(ConvertError::MalformedTriangleList {
            count: indices.len(),
        });
    }

    let table = PositionTable::from_raw(positions);
    let coord_remap = table.remap(indices)?;
    trace!(
        "deduplicated {} positions into {}",
        positions.len(),
        table.len()
    );

    let first_new_normal = registry.len();
    let normal_remap = indices
        .iter()
        .map(|&vertex| {
            normals
                .get(vertex as usize)
                .map(|normal| registry.register(*normal))
                .ok_or(ConvertError::IndexOutOfRange {
                    kind: "normal",
                    index: vertex as i64,
                    len: normals.len(),
                })
        })
        .collect::<Result<Vec<usize>, ConvertError>>()?;

    Ok(TriangleGeometry {
        coordinates: Coordinates {
            points: table.points,
        },
        normals: Normals {
            vectors: registry.vectors()[first_new_normal..].to_vec(),
        },
        triangles: IndexedTriangleSet {
            coord_index: terminated_faces(&coord_remap, "coordinate")?,
            normal_index: terminated_faces(&normal_remap, "normal")?,
        },
    })
}

/// Lay out corner indices as `a, b, c, -1` per triangle.
fn terminated_faces(corners: &[usize], kind: &'static str) -> Result<Vec<i32>, ConvertError> {
    let mut faces = Vec::with_capacity(corners.len() / 3 * 4);
    for triangle in corners.chunks_exact(3) {
        for &corner in triangle {
            let index = i32::try_from(corner).map_err(|_| ConvertError::IndexOutOfRange {
                kind,
                index: corner as i64,
                len: i32::MAX as usize,
            })?;
            faces.push(index);
        }
        faces.push(FACE_TERMINATOR);
    }
    Ok(faces)
}
