use std::path::Path;

use anyhow::Result;

use crate::scene_graph::Group;

/// Serializes a finished scene graph.
///
/// The converter never touches the filesystem itself; implementations own
/// the file format and all I/O.
pub trait SceneWriter {
    /// Write `root` to `destination`, in the binary flavor of the format when
    /// `binary` is set and as text otherwise.
    fn write(&mut self, destination: &Path, root: &Group, binary: bool) -> Result<()>;
}

impl<W: SceneWriter + ?Sized> SceneWriter for &mut W {
    fn write(&mut self, destination: &Path, root: &Group, binary: bool) -> Result<()> {
        (**self).write(destination, root, binary)
    }
}
