mod accessor;
mod geometry;
mod material;
mod normals;
mod types;

use std::path::Path;

use anyhow::{Context, Result};
use log::{error, trace, warn};

use crate::{
    error::ConvertError,
    model::{Mesh, Mode, NORMAL, Node, POSITION, Primitive, Scene, SceneDescription},
    scene_graph::Group,
    writer::SceneWriter,
};

// Re-export the conversion building blocks for callers of this module.
pub use accessor::{decode_indices, decode_vec2, decode_vec3};
pub use geometry::{PositionTable, TriangleGeometry, assemble_triangles};
pub use material::convert_material;
pub use normals::NormalRegistry;
pub use types::ConvertOptions;

use material::material_for;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Convert a scene description into an output scene graph.
///
/// This is the single error boundary of a run: failures are logged here and
/// the partially built tree is dropped.
pub fn convert(scene: &SceneDescription) -> Result<Group, ConvertError> {
    trace!("converting gltf model to open inventor model");

    let mut converter = SceneConverter::new(scene);
    converter
        .convert_model()
        .inspect_err(|err| error!("failed to convert model: {err}"))?;

    Ok(converter.into_root())
}

/// Convert `scene` and hand the finished tree to `writer`.
///
/// The writer is only invoked after a fully successful conversion.
pub fn write_model<W: SceneWriter + ?Sized>(
    scene: &SceneDescription,
    writer: &mut W,
    destination: &Path,
    options: ConvertOptions,
) -> Result<()> {
    let root = convert(scene).context("failed to convert model")?;

    writer
        .write(destination, &root, options.binary)
        .with_context(|| format!("failed to write output: {}", destination.display()))?;

    Ok(())
}

// ─── Traversal ────────────────────────────────────────────────────────────────

/// Walks scenes, nodes, meshes and primitives depth-first, appending the
/// converted nodes of every triangle primitive to one root group.
///
/// The converter owns the normal registry of the run, so one instance must
/// not be reused for a second model.
#[derive(Debug)]
pub struct SceneConverter<'a> {
    scene: &'a SceneDescription,
    normals: NormalRegistry,
    root: Group,
}

impl<'a> SceneConverter<'a> {
    pub fn new(scene: &'a SceneDescription) -> Self {
        Self {
            scene,
            normals: NormalRegistry::new(),
            root: Group::new(),
        }
    }

    pub fn convert_model(&mut self) -> Result<(), ConvertError> {
        let scene = self.scene;
        scene
            .scenes
            .iter()
            .try_for_each(|entry| self.convert_scene(entry))
    }

    pub fn convert_scene(&mut self, scene: &Scene) -> Result<(), ConvertError> {
        trace!(
            "converting scene with name '{}'",
            scene.name.as_deref().unwrap_or_default()
        );

        self.convert_nodes(&scene.nodes)
    }

    /// Stops at the first failing node; nodes converted before it stay in
    /// the output.
    pub fn convert_nodes(&mut self, node_indices: &[i32]) -> Result<(), ConvertError> {
        node_indices
            .iter()
            .try_for_each(|&index| self.convert_node_index(index))
    }

    pub fn convert_node_index(&mut self, node_index: i32) -> Result<(), ConvertError> {
        trace!("converting node with index {node_index}");

        let scene = self.scene;
        let index = checked_index("node", node_index, scene.nodes.len())?;
        self.convert_node(&scene.nodes[index])
    }

    pub fn convert_node(&mut self, node: &Node) -> Result<(), ConvertError> {
        trace!(
            "converting node with name '{}'",
            node.name.as_deref().unwrap_or_default()
        );

        if let Some(mesh_index) = node.mesh {
            self.convert_mesh_index(mesh_index)?;
        }
        self.convert_nodes(&node.children)
    }

    pub fn convert_mesh_index(&mut self, mesh_index: i32) -> Result<(), ConvertError> {
        trace!("converting mesh with index {mesh_index}");

        let scene = self.scene;
        let index = checked_index("mesh", mesh_index, scene.meshes.len())?;
        self.convert_mesh(&scene.meshes[index])
    }

    pub fn convert_mesh(&mut self, mesh: &Mesh) -> Result<(), ConvertError> {
        trace!(
            "converting mesh with name '{}'",
            mesh.name.as_deref().unwrap_or_default()
        );

        mesh.primitives
            .iter()
            .try_for_each(|primitive| self.convert_primitive(primitive))
    }

    /// Triangle lists are converted; any other topology is skipped with a
    /// warning and counts as success.
    pub fn convert_primitive(&mut self, primitive: &Primitive) -> Result<(), ConvertError> {
        trace!("converting primitive with mode {:?}", primitive.mode);

        match primitive.mode {
            Mode::Triangles => self.convert_triangles(primitive),
            mode => {
                warn!("skipping unsupported primitive with mode {mode:?}");
                Ok(())
            }
        }
    }

    fn convert_triangles(&mut self, primitive: &Primitive) -> Result<(), ConvertError> {
        trace!("converting triangles primitive");

        let position_accessor =
            primitive
                .attribute(POSITION)
                .ok_or(ConvertError::MissingAttribute {
                    semantic: POSITION,
                })?;
        let normal_accessor = primitive
            .attribute(NORMAL)
            .ok_or(ConvertError::MissingAttribute { semantic: NORMAL })?;

        trace!("retrieve positions from primitive");
        let positions = decode_vec3(self.scene, position_accessor)?;
        trace!("retrieve normals from primitive");
        let normals = decode_vec3(self.scene, normal_accessor)?;
        trace!("retrieve indices from primitive");
        let indices = match primitive.indices {
            Some(accessor_index) => decode_indices(self.scene, accessor_index)?,
            None => sequential_indices(positions.len())?,
        };

        let material = material_for(self.scene, primitive.material)?;
        let geometry = assemble_triangles(&positions, &normals, &indices, &mut self.normals)?;

        self.root.add_child(material);
        for node in geometry.into_nodes() {
            self.root.add_child(node);
        }

        Ok(())
    }

    /// Normals registered so far in this run.
    pub fn normals(&self) -> &NormalRegistry {
        &self.normals
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn into_root(self) -> Group {
        self.root
    }
}

fn checked_index(kind: &'static str, index: i32, len: usize) -> Result<usize, ConvertError> {
    usize::try_from(index)
        .ok()
        .filter(|&resolved| resolved < len)
        .ok_or(ConvertError::IndexOutOfRange {
            kind,
            index: index.into(),
            len,
        })
}

/// Indices `0..count` for a primitive drawn without an index accessor.
fn sequential_indices(count: usize) -> Result<Vec<u32>, ConvertError> {
    let count = u32::try_from(count).map_err(|_| ConvertError::IndexOutOfRange {
        kind: "vertex",
        index: i64::try_from(count).unwrap_or(i64::MAX),
        len: u32::MAX as usize,
    })?;
    Ok((0..count).collect())
}
