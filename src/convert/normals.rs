use std::collections::HashMap;

use super::geometry::VectorKey;
use crate::scene_graph::Normal;

/// Run-wide normal table shared by every primitive of one conversion.
///
/// Indices are handed out densely from zero in first-seen order and never
/// change once assigned, so primitives converted later can address normals
/// emitted by earlier ones.
#[derive(Debug, Clone, Default)]
pub struct NormalRegistry {
    indices: HashMap<VectorKey, usize>,
    vectors: Vec<Normal>,
}

impl NormalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `normal`, assigning the next free one on first sight.
    pub fn register(&mut self, normal: Normal) -> usize {
        let next = self.vectors.len();
        let index = *self.indices.entry(VectorKey::from(&normal)).or_insert(next);
        if index == next {
            self.vectors.push(normal);
        }
        index
    }

    pub fn index_of(&self, normal: &Normal) -> Option<usize> {
        self.indices.get(&VectorKey::from(normal)).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Normal> {
        self.vectors.get(index)
    }

    /// Every registered normal in index order.
    pub fn vectors(&self) -> &[Normal] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
