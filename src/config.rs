/// Bounds applied to a [`Vfs`](struct.Vfs.html).
///
/// The defaults match what a small game engine needs: eight layers, and
/// paths that fit a 256 byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsConfig {
    /// How many sources may be mounted at once.
    pub max_mounts: usize,
    /// Path bound in bytes. Mount paths must be strictly shorter than this,
    /// and a directory root joined with a queried name (plus separator) must
    /// fit within it.
    pub max_path: usize,
}

pub const DEFAULT_MAX_MOUNTS: usize = 8;
pub const DEFAULT_MAX_PATH: usize = 256;

impl Default for VfsConfig {
    fn default() -> VfsConfig {
        VfsConfig {
            max_mounts: DEFAULT_MAX_MOUNTS,
            max_path: DEFAULT_MAX_PATH,
        }
    }
}

impl VfsConfig {
    pub fn with_max_mounts(mut self, max_mounts: usize) -> VfsConfig {
        self.max_mounts = max_mounts;
        self
    }
    pub fn with_max_path(mut self, max_path: usize) -> VfsConfig {
        self.max_path = max_path;
        self
    }
}
