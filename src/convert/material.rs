use crate::{
    error::ConvertError,
    model::{self, SceneDescription},
    scene_graph::{Color, Material},
};

const AMBIENT: [f32; 3] = [0.2, 0.2, 0.2];
const SHININESS: f32 = 0.2;

/// Base color used for primitives without a material reference.
const DEFAULT_BASE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Resolve a primitive's material reference and convert it.
pub(super) fn material_for(
    scene: &SceneDescription,
    material_index: Option<usize>,
) -> Result<Material, ConvertError> {
    let Some(index) = material_index else {
        return Ok(convert_material(None));
    };

    let material = scene
        .materials
        .get(index)
        .ok_or(ConvertError::IndexOutOfRange {
            kind: "material",
            index: index as i64,
            len: scene.materials.len(),
        })?;

    Ok(convert_material(Some(material)))
}

/// Approximate a metallic-roughness material with a fixed Phong setup.
///
/// Only the RGB part of the base color factor survives, as the diffuse
/// color. Metallic, roughness, textures and alpha are dropped.
pub fn convert_material(material: Option<&model::Material>) -> Material {
    let base_color = material
        .map(|material| material.base_color_factor)
        .unwrap_or(DEFAULT_BASE_COLOR);

    Material {
        ambient: Color::from(AMBIENT),
        diffuse: Color::new(base_color[0], base_color[1], base_color[2]),
        specular: Color::zeros(),
        emissive: Color::zeros(),
        shininess: SHININESS,
        transparency: 0.0,
    }
}
