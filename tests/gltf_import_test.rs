mod common;

use std::borrow::Cow;

use gltf::binary::{Glb, Header};
use gltf2iv::{
    convert,
    model::{ComponentType, ElementShape, Mode, SceneDescription},
    scene_graph::SceneNode,
};
use nalgebra::Vector3;

use common::{TRIANGLE_NODE_KINDS, init_logging, kinds};

/// One red triangle under a root node, plus a line strip primitive reusing
/// the same positions.
fn triangle_glb() -> Vec<u8> {
    let mut bin = Vec::<u8>::new();
    for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0] {
        bin.extend_from_slice(&value.to_le_bytes());
    }
    for _ in 0..3 {
        for value in [0.0f32, 0.0, 1.0] {
            bin.extend_from_slice(&value.to_le_bytes());
        }
    }
    for index in [0u32, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }

    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "main", "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1] },
            { "name": "triangle", "mesh": 0 }
        ],
        "meshes": [{
            "name": "red_triangle",
            "primitives": [
                {
                    "attributes": { "POSITION": 0, "NORMAL": 1 },
                    "indices": 2,
                    "material": 0
                },
                {
                    "attributes": { "POSITION": 0 },
                    "mode": 3
                }
            ]
        }],
        "materials": [{
            "name": "red",
            "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 12 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" }
        ]
    });

    let glb = Glb {
        header: Header {
            magic: *b"glTF",
            version: 2,
            length: 0,
        },
        json: Cow::Owned(serde_json::to_vec(&json).unwrap()),
        bin: Some(Cow::Owned(bin)),
    };

    let mut out = Vec::new();
    glb.to_writer(&mut out).unwrap();
    out
}

fn import_triangle() -> SceneDescription {
    let (document, buffers, _images) = gltf::import_slice(triangle_glb()).unwrap();
    SceneDescription::from_gltf(&document, &buffers)
}

#[test]
fn given_glb_document_when_importing_then_structure_is_carried_over() {
    let scene = import_triangle();

    assert_eq!(scene.scenes.len(), 1);
    assert_eq!(scene.scenes[0].nodes, vec![0]);
    assert_eq!(scene.nodes[0].children, vec![1]);
    assert_eq!(scene.nodes[1].mesh, Some(0));
    assert_eq!(scene.nodes[1].name.as_deref(), Some("triangle"));

    let primitives = &scene.meshes[0].primitives;
    assert_eq!(primitives[0].mode, Mode::Triangles);
    assert_eq!(primitives[0].indices, Some(2));
    assert_eq!(primitives[0].material, Some(0));
    assert_eq!(primitives[1].mode, Mode::LineStrip);
    assert_eq!(primitives[1].material, None);

    assert_eq!(scene.accessors[2].component_type, ComponentType::U32);
    assert_eq!(scene.accessors[2].shape, ElementShape::Scalar);
    assert_eq!(scene.accessors[1].view.map(|view| view.byte_offset), Some(36));
    assert_eq!(scene.materials[0].base_color_factor, [1.0, 0.0, 0.0, 1.0]);
    assert!(scene.buffers[0].data.len() >= 84);
}

#[test]
fn given_imported_glb_when_converting_then_line_strip_is_skipped_and_triangle_is_emitted() {
    init_logging();

    let root = convert(&import_triangle()).unwrap();

    assert_eq!(kinds(&root), TRIANGLE_NODE_KINDS.to_vec());
    let Some(SceneNode::Material(material)) = root.iter().next() else {
        panic!("expected material");
    };
    assert_eq!(material.diffuse, Vector3::new(1.0, 0.0, 0.0));

    let Some(SceneNode::IndexedTriangleSet(triangles)) = root.iter().last() else {
        panic!("expected indexed triangle set");
    };
    assert_eq!(triangles.coord_index, vec![0, 1, 2, -1]);
    assert_eq!(triangles.normal_index, vec![0, 0, 0, -1]);
}
