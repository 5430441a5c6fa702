use serde::{Deserialize, Serialize};

/// Options accepted by [`write_model`](super::write_model).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Ask the writer for its binary format instead of text. The converter
    /// itself does not interpret this flag.
    pub binary: bool,
}
