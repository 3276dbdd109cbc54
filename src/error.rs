use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while mounting, unmounting or reading.
///
/// Callers that only care about success or failure can ignore the variant.
/// None of these are fatal; the table is left as it was before the failing
/// call.
#[derive(Debug, Error)]
pub enum Error {
    /// A mount path, or a mount root joined with a queried name, does not fit
    /// in the configured path bound.
    #[error("path too long ({len} bytes, limit is {limit}): {path:?}")]
    PathTooLong { path: String, len: usize, limit: usize },
    /// The exact same path is already mounted.
    #[error("already mounted: {0:?}")]
    AlreadyMounted(String),
    /// The mount table is full.
    #[error("mount table is full ({0} mounts)")]
    CapacityExceeded(usize),
    /// No mount can supply the requested file, or the source to mount does
    /// not exist.
    #[error("not found: {0:?}")]
    NotFound(String),
    /// Unmount was asked for a path that isn't mounted.
    #[error("not mounted: {0:?}")]
    NotMounted(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file is not a tar archive and carries no usable trailer either.
    #[error("malformed archive {path:?}: {reason}")]
    MalformedArchive { path: String, reason: &'static str },
    /// The buffer for a read could not be allocated.
    #[error("could not allocate {0} bytes")]
    AllocationFailure(usize),
}

impl Error {
    pub(crate) fn path_too_long(path: impl Into<String>, len: usize,
                                limit: usize) -> Self {
        Error::PathTooLong { path: path.into(), len, limit }
    }

    pub(crate) fn malformed(path: impl Into<String>,
                            reason: &'static str) -> Self {
        Error::MalformedArchive { path: path.into(), reason }
    }
}

/// Allocates a zeroed buffer of exactly `len` bytes, reporting failure
/// instead of aborting.
pub(crate) fn alloc_buffer(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure(len))?;
    buf.resize(len, 0);
    Ok(buf)
}
