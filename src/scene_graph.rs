//! Output scene graph in the Open Inventor node vocabulary.
//!
//! The tree is plain data: a root [`Group`] exclusively owns every emitted
//! node in emission order. Property nodes (materials, coordinates, normals,
//! bindings) affect the shape nodes that follow them within the same group,
//! with one exception: [`Normals`] nodes are deltas of a run-wide normal list
//! (see [`Normals`]).

use nalgebra::{Vector2, Vector3};
use serde::Serialize;

pub type Position = Vector3<f32>;
pub type Normal = Vector3<f32>;
pub type Color = Vector3<f32>;
pub type TextureCoordinate = Vector2<f32>;

/// Separates consecutive faces inside an index array.
pub const FACE_TERMINATOR: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Group,
    Material,
    MaterialBinding,
    Coordinates,
    Normals,
    NormalBinding,
    IndexedTriangleSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SceneNode {
    Group(Group),
    Material(Material),
    MaterialBinding(Binding),
    Coordinates(Coordinates),
    Normals(Normals),
    NormalBinding(Binding),
    IndexedTriangleSet(IndexedTriangleSet),
}

impl SceneNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SceneNode::Group(_) => NodeKind::Group,
            SceneNode::Material(_) => NodeKind::Material,
            SceneNode::MaterialBinding(_) => NodeKind::MaterialBinding,
            SceneNode::Coordinates(_) => NodeKind::Coordinates,
            SceneNode::Normals(_) => NodeKind::Normals,
            SceneNode::NormalBinding(_) => NodeKind::NormalBinding,
            SceneNode::IndexedTriangleSet(_) => NodeKind::IndexedTriangleSet,
        }
    }

    /// Child nodes; empty for every kind except [`SceneNode::Group`].
    pub fn children(&self) -> &[SceneNode] {
        match self {
            SceneNode::Group(group) => &group.children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    pub children: Vec<SceneNode>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&mut self, child: impl Into<SceneNode>) {
        self.children.push(child.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneNode> {
        self.children.iter()
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a SceneNode;
    type IntoIter = std::slice::Iter<'a, SceneNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Classic Phong-style surface description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub shininess: f32,
    pub transparency: f32,
}

/// How a property is mapped onto the faces and vertices of the shapes that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Binding {
    /// One value for the whole shape.
    Overall,
    PerFace,
    PerFaceIndexed,
    PerVertex,
    /// One value per face corner, addressed through an explicit index array.
    PerVertexIndexed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coordinates {
    pub points: Vec<Position>,
}

/// Normals first seen by one primitive, appended to the run-wide normal list.
///
/// Triangle sets index that whole list, so a set may reference normals
/// carried by earlier `Normals` nodes. Open Inventor treats each normal node
/// as a replacement rather than an append; a writer targeting it must emit the
/// concatenation of all preceding `Normals` nodes, or a single merged list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normals {
    pub vectors: Vec<Normal>,
}

/// Triangles addressed through per-corner coordinate and normal indices.
///
/// Both arrays hold three indices per triangle followed by [`FACE_TERMINATOR`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexedTriangleSet {
    pub coord_index: Vec<i32>,
    pub normal_index: Vec<i32>,
}

impl IndexedTriangleSet {
    pub fn triangle_count(&self) -> usize {
        self.coord_index
            .iter()
            .filter(|&&index| index == FACE_TERMINATOR)
            .count()
    }

    /// Coordinate index triples, one per face.
    pub fn coord_triangles(&self) -> impl Iterator<Item = [i32; 3]> + '_ {
        triangles(&self.coord_index)
    }

    /// Normal index triples, one per face.
    pub fn normal_triangles(&self) -> impl Iterator<Item = [i32; 3]> + '_ {
        triangles(&self.normal_index)
    }
}

fn triangles(indices: &[i32]) -> impl Iterator<Item = [i32; 3]> + '_ {
    indices
        .split(|&index| index == FACE_TERMINATOR)
        .filter(|face| face.len() == 3)
        .map(|face| [face[0], face[1], face[2]])
}

impl From<Group> for SceneNode {
    fn from(value: Group) -> Self {
        SceneNode::Group(value)
    }
}

impl From<Material> for SceneNode {
    fn from(value: Material) -> Self {
        SceneNode::Material(value)
    }
}

impl From<Coordinates> for SceneNode {
    fn from(value: Coordinates) -> Self {
        SceneNode::Coordinates(value)
    }
}

impl From<Normals> for SceneNode {
    fn from(value: Normals) -> Self {
        SceneNode::Normals(value)
    }
}

impl From<IndexedTriangleSet> for SceneNode {
    fn from(value: IndexedTriangleSet) -> Self {
        SceneNode::IndexedTriangleSet(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_terminated_index_array_when_splitting_then_triangles_are_returned() {
        let set = IndexedTriangleSet {
            coord_index: vec![0, 1, 2, -1, 2, 1, 3, -1],
            normal_index: vec![0, 0, 0, -1, 1, 1, 1, -1],
        };

        assert_eq!(set.triangle_count(), 2);
        assert_eq!(
            set.coord_triangles().collect::<Vec<_>>(),
            vec![[0, 1, 2], [2, 1, 3]]
        );
        assert_eq!(
            set.normal_triangles().collect::<Vec<_>>(),
            vec![[0, 0, 0], [1, 1, 1]]
        );
    }

    #[test]
    fn given_group_when_adding_children_then_emission_order_is_kept() {
        let mut group = Group::new();
        group.add_child(Coordinates::default());
        group.add_child(SceneNode::NormalBinding(Binding::PerVertexIndexed));

        let kinds: Vec<NodeKind> = group.iter().map(SceneNode::kind).collect();
        assert_eq!(kinds, vec![NodeKind::Coordinates, NodeKind::NormalBinding]);
        assert!(SceneNode::Group(group).children().len() == 2);
    }
}
