//! Converts glTF scene descriptions into an Open Inventor style scene graph.
//!
//! The crate works purely in memory: a loader hands over a
//! [`SceneDescription`](model::SceneDescription), [`convert`] produces the
//! output [`Group`](scene_graph::Group), and a [`SceneWriter`](writer::SceneWriter)
//! supplied by the caller serializes it.

pub mod convert;
pub mod error;
pub mod model;
pub mod scene_graph;
pub mod writer;

pub use convert::{ConvertOptions, SceneConverter, convert, write_model};
pub use error::ConvertError;
