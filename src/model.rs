//! Input scene description handed over by a glTF loader.
//!
//! Everything here is plain owned data, read-only for the duration of a
//! conversion run. Node and mesh references keep the signed representation
//! glTF loaders use, so invalid references can reach the converter and be
//! rejected there instead of being lost during loading.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

pub const POSITION: &str = "POSITION";
pub const NORMAL: &str = "NORMAL";
pub const TEXCOORD_0: &str = "TEXCOORD_0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub materials: Vec<Material>,
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub name: Option<String>,
    /// Root node references.
    pub nodes: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Diagnostic only.
    pub name: Option<String>,
    pub mesh: Option<i32>,
    pub children: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Primitive {
    pub mode: Mode,
    /// Semantic name (`POSITION`, `NORMAL`, `TEXCOORD_0`, ...) to accessor index.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

impl Primitive {
    pub fn attribute(&self, semantic: &str) -> Option<usize> {
        self.attributes.get(semantic).copied()
    }
}

/// Primitive topology, serialized as its glTF mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl TryFrom<u32> for Mode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Points),
            1 => Ok(Mode::Lines),
            2 => Ok(Mode::LineLoop),
            3 => Ok(Mode::LineStrip),
            4 => Ok(Mode::Triangles),
            5 => Ok(Mode::TriangleStrip),
            6 => Ok(Mode::TriangleFan),
            other => Err(format!("unknown primitive mode {other}")),
        }
    }
}

impl From<Mode> for u32 {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Points => 0,
            Mode::Lines => 1,
            Mode::LineLoop => 2,
            Mode::LineStrip => 3,
            Mode::Triangles => 4,
            Mode::TriangleStrip => 5,
            Mode::TriangleFan => 6,
        }
    }
}

/// A typed, shaped view over a byte run of one buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accessor {
    pub component_type: ComponentType,
    #[serde(rename = "type")]
    pub shape: ElementShape,
    pub count: usize,
    /// `None` means every element is zero.
    #[serde(default)]
    pub view: Option<BufferView>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferView {
    pub buffer: usize,
    /// Offset of the first element, buffer view and accessor offsets combined.
    pub byte_offset: usize,
    /// Distance between consecutive elements; tightly packed when `None`.
    pub byte_stride: Option<usize>,
}

/// Accessor storage kind, serialized as its GL enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    Other(u32),
}

impl ComponentType {
    /// Width of one component in bytes, `None` for unknown storage kinds.
    pub fn size(self) -> Option<usize> {
        match self {
            ComponentType::I8 | ComponentType::U8 => Some(1),
            ComponentType::I16 | ComponentType::U16 => Some(2),
            ComponentType::I32 | ComponentType::U32 | ComponentType::F32 => Some(4),
            ComponentType::Other(_) => None,
        }
    }
}

impl From<u32> for ComponentType {
    fn from(value: u32) -> Self {
        match value {
            5120 => ComponentType::I8,
            5121 => ComponentType::U8,
            5122 => ComponentType::I16,
            5123 => ComponentType::U16,
            5124 => ComponentType::I32,
            5125 => ComponentType::U32,
            5126 => ComponentType::F32,
            other => ComponentType::Other(other),
        }
    }
}

impl From<ComponentType> for u32 {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::I8 => 5120,
            ComponentType::U8 => 5121,
            ComponentType::I16 => 5122,
            ComponentType::U16 => 5123,
            ComponentType::I32 => 5124,
            ComponentType::U32 => 5125,
            ComponentType::F32 => 5126,
            ComponentType::Other(code) => code,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u32::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElementShape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementShape {
    pub fn component_count(self) -> usize {
        match self {
            ElementShape::Scalar => 1,
            ElementShape::Vec2 => 2,
            ElementShape::Vec3 => 3,
            ElementShape::Vec4 | ElementShape::Mat2 => 4,
            ElementShape::Mat3 => 9,
            ElementShape::Mat4 => 16,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ElementShape::Scalar => "SCALAR",
            ElementShape::Vec2 => "VEC2",
            ElementShape::Vec3 => "VEC3",
            ElementShape::Vec4 => "VEC4",
            ElementShape::Mat2 => "MAT2",
            ElementShape::Mat3 => "MAT3",
            ElementShape::Mat4 => "MAT4",
        }
    }
}

impl fmt::Display for ElementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub name: Option<String>,
    /// Linear RGBA in 0..1.
    pub base_color_factor: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Buffer {
    pub data: Vec<u8>,
}

// ─── glTF import ──────────────────────────────────────────────────────────────

impl SceneDescription {
    /// Build a scene description from a document loaded by the `gltf` crate.
    ///
    /// Sparse accessor substitutions are not applied; the dense view is used
    /// as-is.
    pub fn from_gltf(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Self {
        Self {
            scenes: document
                .scenes()
                .map(|scene| Scene {
                    name: scene.name().map(ToOwned::to_owned),
                    nodes: scene.nodes().map(|node| node.index() as i32).collect(),
                })
                .collect(),
            nodes: document
                .nodes()
                .map(|node| Node {
                    name: node.name().map(ToOwned::to_owned),
                    mesh: node.mesh().map(|mesh| mesh.index() as i32),
                    children: node.children().map(|child| child.index() as i32).collect(),
                })
                .collect(),
            meshes: document
                .meshes()
                .map(|mesh| Mesh {
                    name: mesh.name().map(ToOwned::to_owned),
                    primitives: mesh
                        .primitives()
                        .map(|primitive| convert_primitive(&primitive))
                        .collect(),
                })
                .collect(),
            accessors: document
                .accessors()
                .map(|accessor| convert_accessor(&accessor))
                .collect(),
            materials: document
                .materials()
                .map(|material| Material {
                    name: material.name().map(ToOwned::to_owned),
                    base_color_factor: material.pbr_metallic_roughness().base_color_factor(),
                })
                .collect(),
            buffers: buffers
                .iter()
                .map(|buffer| Buffer {
                    data: buffer.0.clone(),
                })
                .collect(),
        }
    }
}

fn convert_primitive(primitive: &gltf::Primitive<'_>) -> Primitive {
    Primitive {
        mode: match primitive.mode() {
            gltf::mesh::Mode::Points => Mode::Points,
            gltf::mesh::Mode::Lines => Mode::Lines,
            gltf::mesh::Mode::LineLoop => Mode::LineLoop,
            gltf::mesh::Mode::LineStrip => Mode::LineStrip,
            gltf::mesh::Mode::Triangles => Mode::Triangles,
            gltf::mesh::Mode::TriangleStrip => Mode::TriangleStrip,
            gltf::mesh::Mode::TriangleFan => Mode::TriangleFan,
        },
        attributes: primitive
            .attributes()
            .map(|(semantic, accessor)| (semantic.to_string(), accessor.index()))
            .collect(),
        indices: primitive.indices().map(|accessor| accessor.index()),
        material: primitive.material().index(),
    }
}

fn convert_accessor(accessor: &gltf::Accessor<'_>) -> Accessor {
    use gltf::accessor::{DataType, Dimensions};

    Accessor {
        component_type: match accessor.data_type() {
            DataType::I8 => ComponentType::I8,
            DataType::U8 => ComponentType::U8,
            DataType::I16 => ComponentType::I16,
            DataType::U16 => ComponentType::U16,
            DataType::U32 => ComponentType::U32,
            DataType::F32 => ComponentType::F32,
        },
        shape: match accessor.dimensions() {
            Dimensions::Scalar => ElementShape::Scalar,
            Dimensions::Vec2 => ElementShape::Vec2,
            Dimensions::Vec3 => ElementShape::Vec3,
            Dimensions::Vec4 => ElementShape::Vec4,
            Dimensions::Mat2 => ElementShape::Mat2,
            Dimensions::Mat3 => ElementShape::Mat3,
            Dimensions::Mat4 => ElementShape::Mat4,
        },
        count: accessor.count(),
        view: accessor.view().map(|view| BufferView {
            buffer: view.buffer().index(),
            byte_offset: view.offset() + accessor.offset(),
            byte_stride: view.stride(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_gl_codes_when_converting_component_type_then_unknown_codes_are_kept() {
        assert_eq!(ComponentType::from(5126), ComponentType::F32);
        assert_eq!(ComponentType::from(5130), ComponentType::Other(5130));
        assert_eq!(u32::from(ComponentType::Other(5130)), 5130);
        assert_eq!(ComponentType::Other(5130).size(), None);
    }

    #[test]
    fn given_mode_codes_when_converting_then_only_gltf_modes_are_accepted() {
        assert_eq!(Mode::try_from(4), Ok(Mode::Triangles));
        assert_eq!(Mode::try_from(1), Ok(Mode::Lines));
        assert!(Mode::try_from(7).is_err());
    }

    #[test]
    fn given_matrix_shapes_when_counting_components_then_all_entries_are_counted() {
        assert_eq!(ElementShape::Scalar.component_count(), 1);
        assert_eq!(ElementShape::Mat3.component_count(), 9);
        assert_eq!(ElementShape::Mat4.component_count(), 16);
    }

    #[test]
    fn given_material_without_factor_when_defaulted_then_base_color_is_white() {
        assert_eq!(Material::default().base_color_factor, [1.0, 1.0, 1.0, 1.0]);
    }
}
