use log::trace;
use nalgebra::{Vector2, Vector3};

use crate::{
    error::ConvertError,
    model::{Accessor, ComponentType, ElementShape, SceneDescription},
};

// ─── Accessor metadata ────────────────────────────────────────────────────────

/// Storage kinds the decoder can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
}

impl Storage {
    fn resolve(component_type: ComponentType) -> Option<Self> {
        match component_type {
            ComponentType::I8 => Some(Storage::I8),
            ComponentType::U8 => Some(Storage::U8),
            ComponentType::I16 => Some(Storage::I16),
            ComponentType::U16 => Some(Storage::U16),
            ComponentType::I32 => Some(Storage::I32),
            ComponentType::U32 => Some(Storage::U32),
            ComponentType::F32 => Some(Storage::F32),
            ComponentType::Other(_) => None,
        }
    }

    fn size(self) -> usize {
        match self {
            Storage::I8 | Storage::U8 => 1,
            Storage::I16 | Storage::U16 => 2,
            Storage::I32 | Storage::U32 | Storage::F32 => 4,
        }
    }
}

/// Resolved byte layout of one accessor.
#[derive(Debug, Clone, Copy)]
struct AccessorLayout<'a> {
    index: usize,
    accessor: &'a Accessor,
    storage: Storage,
    bytes: &'a [u8],
    base_offset: usize,
    stride: usize,
}

fn accessor_at(scene: &SceneDescription, index: usize) -> Result<&Accessor, ConvertError> {
    scene
        .accessors
        .get(index)
        .ok_or(ConvertError::IndexOutOfRange {
            kind: "accessor",
            index: index as i64,
            len: scene.accessors.len(),
        })
}

fn ensure_accessor_type(accessor: &Accessor, expected: ElementShape) -> Result<(), ConvertError> {
    if accessor.shape != expected {
        return Err(ConvertError::TypeMismatch {
            expected,
            actual: accessor.shape,
        });
    }
    Ok(())
}

fn layout<'a>(
    scene: &'a SceneDescription,
    index: usize,
    accessor: &'a Accessor,
    usage: &'static str,
) -> Result<AccessorLayout<'a>, ConvertError> {
    let storage =
        Storage::resolve(accessor.component_type).ok_or(ConvertError::UnsupportedComponentType {
            component_type: accessor.component_type,
            usage,
        })?;

    let (bytes, base_offset, stride) = match accessor.view {
        Some(view) => {
            let buffer =
                scene
                    .buffers
                    .get(view.buffer)
                    .ok_or(ConvertError::IndexOutOfRange {
                        kind: "buffer",
                        index: view.buffer as i64,
                        len: scene.buffers.len(),
                    })?;
            let packed = storage.size() * accessor.shape.component_count();
            // A zero stride means tightly packed, as in GL vertex attribute pointers.
            let stride = view.byte_stride.filter(|&stride| stride != 0).unwrap_or(packed);
            (buffer.data.as_slice(), view.byte_offset, stride)
        }
        None => (&[][..], 0, 0),
    };

    Ok(AccessorLayout {
        index,
        accessor,
        storage,
        bytes,
        base_offset,
        stride,
    })
}

// ─── Component reads ──────────────────────────────────────────────────────────

impl AccessorLayout<'_> {
    fn out_of_bounds(&self, offset: usize) -> ConvertError {
        ConvertError::AccessorOutOfBounds {
            accessor: self.index,
            offset,
            len: self.bytes.len(),
        }
    }

    /// One past the last byte the accessor touches (0 when empty), `None` on
    /// overflow.
    fn end_offset(&self) -> Option<usize> {
        let element_size = self.storage.size() * self.accessor.shape.component_count();
        match self.accessor.count.checked_sub(1) {
            None => Some(0),
            Some(last) => last
                .checked_mul(self.stride)?
                .checked_add(self.base_offset)?
                .checked_add(element_size),
        }
    }

    /// Every component of every element, widened to `f64` (exact for all
    /// supported storage kinds).
    fn components(&self) -> Result<Vec<f64>, ConvertError> {
        let lanes = self.accessor.shape.component_count();
        let total = self
            .accessor
            .count
            .checked_mul(lanes)
            .ok_or_else(|| self.out_of_bounds(usize::MAX))?;

        if self.accessor.view.is_none() {
            return Ok(vec![0.0; total]);
        }

        // Checked before allocating, so the capacity is bounded by the buffer.
        match self.end_offset() {
            Some(end) if end <= self.bytes.len() => {}
            end => return Err(self.out_of_bounds(end.unwrap_or(usize::MAX))),
        }

        let component_size = self.storage.size();
        let mut values = Vec::with_capacity(total);
        for element in 0..self.accessor.count {
            for lane in 0..lanes {
                let offset = self.base_offset + element * self.stride + lane * component_size;
                values.push(self.read_component(offset)?);
            }
        }
        Ok(values)
    }

    fn read_component(&self, offset: usize) -> Result<f64, ConvertError> {
        let end = offset + self.storage.size();
        let bytes = self
            .bytes
            .get(offset..end)
            .ok_or_else(|| self.out_of_bounds(end))?;

        let value = match self.storage {
            Storage::I8 => i8::from_le_bytes([bytes[0]]) as f64,
            Storage::U8 => bytes[0] as f64,
            Storage::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            Storage::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            Storage::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            Storage::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            Storage::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
        };
        Ok(value)
    }
}

// ─── Attribute decoding ───────────────────────────────────────────────────────

/// Decode a VEC3 accessor (positions, normals) into float vectors.
pub fn decode_vec3(
    scene: &SceneDescription,
    accessor_index: usize,
) -> Result<Vec<Vector3<f32>>, ConvertError> {
    trace!("decoding VEC3 accessor {accessor_index}");

    let accessor = accessor_at(scene, accessor_index)?;
    ensure_accessor_type(accessor, ElementShape::Vec3)?;

    let values = layout(scene, accessor_index, accessor, "vector attributes")?.components()?;
    Ok(values
        .chunks_exact(3)
        .map(|v| Vector3::new(v[0] as f32, v[1] as f32, v[2] as f32))
        .collect())
}

/// Decode a VEC2 accessor (texture coordinates) into float vectors.
///
/// Triangle conversion does not read texture coordinates; this is exposed
/// for callers that need them alongside the converted tree.
pub fn decode_vec2(
    scene: &SceneDescription,
    accessor_index: usize,
) -> Result<Vec<Vector2<f32>>, ConvertError> {
    trace!("decoding VEC2 accessor {accessor_index}");

    let accessor = accessor_at(scene, accessor_index)?;
    ensure_accessor_type(accessor, ElementShape::Vec2)?;

    let values = layout(scene, accessor_index, accessor, "vector attributes")?.components()?;
    Ok(values
        .chunks_exact(2)
        .map(|v| Vector2::new(v[0] as f32, v[1] as f32))
        .collect())
}

/// Decode a SCALAR index accessor into vertex indices.
///
/// 32-bit signed storage is not a valid index type in glTF and is rejected
/// even though the decoder can read it for other attributes.
pub fn decode_indices(
    scene: &SceneDescription,
    accessor_index: usize,
) -> Result<Vec<u32>, ConvertError> {
    trace!("decoding index accessor {accessor_index}");

    let accessor = accessor_at(scene, accessor_index)?;
    ensure_accessor_type(accessor, ElementShape::Scalar)?;

    if accessor.component_type == ComponentType::I32 {
        return Err(ConvertError::UnsupportedComponentType {
            component_type: accessor.component_type,
            usage: "indices",
        });
    }

    let values = layout(scene, accessor_index, accessor, "indices")?.components()?;
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
                Ok(value as u32)
            } else {
                Err(ConvertError::InvalidIndexValue {
                    accessor: accessor_index,
                    position,
                })
            }
        })
        .collect()
}
