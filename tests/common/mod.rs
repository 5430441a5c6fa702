#![allow(dead_code)]

use std::collections::BTreeMap;

use gltf2iv::{
    model::{
        Accessor, Buffer, BufferView, ComponentType, ElementShape, Material, Mesh, Mode, NORMAL,
        Node, POSITION, Primitive, Scene, SceneDescription,
    },
    scene_graph::{Group, NodeKind, SceneNode},
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Incrementally builds a scene description with one buffer per accessor.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    pub scene: SceneDescription,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accessor(
        &mut self,
        component_type: ComponentType,
        shape: ElementShape,
        count: usize,
        data: Vec<u8>,
    ) -> usize {
        self.scene.buffers.push(Buffer { data });
        self.scene.accessors.push(Accessor {
            component_type,
            shape,
            count,
            view: Some(BufferView {
                buffer: self.scene.buffers.len() - 1,
                byte_offset: 0,
                byte_stride: None,
            }),
        });
        self.scene.accessors.len() - 1
    }

    pub fn vec3(&mut self, values: &[[f32; 3]]) -> usize {
        let data = values
            .iter()
            .flatten()
            .flat_map(|value| value.to_le_bytes())
            .collect();
        self.accessor(ComponentType::F32, ElementShape::Vec3, values.len(), data)
    }

    pub fn indices_u32(&mut self, indices: &[u32]) -> usize {
        let data = indices.iter().flat_map(|index| index.to_le_bytes()).collect();
        self.accessor(ComponentType::U32, ElementShape::Scalar, indices.len(), data)
    }

    pub fn material(&mut self, base_color_factor: [f32; 4]) -> usize {
        self.scene.materials.push(Material {
            name: None,
            base_color_factor,
        });
        self.scene.materials.len() - 1
    }

    pub fn triangles(
        &mut self,
        positions: &[[f32; 3]],
        normals: &[[f32; 3]],
        indices: &[u32],
        material: Option<usize>,
    ) -> Primitive {
        let positions = self.vec3(positions);
        let normals = self.vec3(normals);
        let indices = self.indices_u32(indices);
        Primitive {
            mode: Mode::Triangles,
            attributes: BTreeMap::from([
                (POSITION.to_string(), positions),
                (NORMAL.to_string(), normals),
            ]),
            indices: Some(indices),
            material,
        }
    }

    pub fn mesh(&mut self, primitives: Vec<Primitive>) -> i32 {
        self.scene.meshes.push(Mesh {
            name: None,
            primitives,
        });
        (self.scene.meshes.len() - 1) as i32
    }

    pub fn node(&mut self, mesh: Option<i32>, children: Vec<i32>) -> i32 {
        self.scene.nodes.push(Node {
            name: None,
            mesh,
            children,
        });
        (self.scene.nodes.len() - 1) as i32
    }

    pub fn scene(&mut self, roots: Vec<i32>) -> &mut Self {
        self.scene.scenes.push(Scene {
            name: None,
            nodes: roots,
        });
        self
    }

    pub fn build(self) -> SceneDescription {
        self.scene
    }
}

pub fn kinds(group: &Group) -> Vec<NodeKind> {
    group.iter().map(SceneNode::kind).collect()
}

pub const TRIANGLE_NODE_KINDS: [NodeKind; 6] = [
    NodeKind::Material,
    NodeKind::Coordinates,
    NodeKind::MaterialBinding,
    NodeKind::Normals,
    NodeKind::NormalBinding,
    NodeKind::IndexedTriangleSet,
];
