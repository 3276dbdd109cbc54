use crate::*;

use std::{
    io::ErrorKind,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// What a mount found at a given name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    /// Present, but neither a regular file nor a directory (e.g. a symlink
    /// stored in an archive).
    Other,
}

/// Which backend is serving a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    Directory,
    Archive,
}

pub(crate) trait VfsSource: Send + Sync {
    /// Classifies a name relative to this source's root, or returns `None` if
    /// the source has nothing by that name.
    fn node_kind(&self, name: &str) -> Option<NodeKind>;
    fn exists(&self, name: &str) -> bool {
        self.node_kind(name).is_some()
    }
    fn is_file(&self, name: &str) -> bool {
        self.node_kind(name) == Some(NodeKind::File)
    }
    /// Reads the whole of a file. The buffer belongs to the caller.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

struct Mount {
    path: String,
    kind: MountKind,
    source: Box<dyn VfsSource>,
}

struct VfsInner {
    config: VfsConfig,
    /// Oldest first. Lookups walk this backwards.
    mounts: Vec<Mount>,
}

impl VfsInner {
    fn teardown(&mut self) {
        while let Some(mount) = self.mounts.pop() {
            log::info!("unmounted {:?} ({:?})", mount.path, mount.kind);
        }
    }
}

impl Drop for VfsInner {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// The mount table. Clones share the same table.
#[derive(Clone)]
pub struct Vfs {
    inner: Arc<RwLock<VfsInner>>,
}

impl Default for Vfs {
    fn default() -> Vfs { Vfs::new() }
}

#[cfg(feature = "stdpaths")]
mod stdpaths;

/// Tries each backend in turn: archive first, then directory.
fn open_source(path: &str, max_path: usize)
               -> Result<(MountKind, Box<dyn VfsSource>)> {
    #[cfg(feature = "archive")]
    let archive_err = match crate::archive::Source::new(path) {
        Ok(x) => {
            let source: Box<dyn VfsSource> = Box::new(x);
            return Ok((MountKind::Archive, source))
        },
        Err(x) => {
            log::debug!("{:?} is not an archive: {}", path, x);
            Some(x)
        },
    };
    #[cfg(not(feature = "archive"))]
    let archive_err: Option<Error> = None;
    #[cfg(feature = "dir")]
    match crate::dir::Source::new(path, max_path) {
        Ok(x) => {
            let source: Box<dyn VfsSource> = Box::new(x);
            return Ok((MountKind::Directory, source))
        },
        Err(x) => log::debug!("{:?} is not a directory: {}", path, x),
    }
    #[cfg(not(feature = "dir"))]
    let _ = max_path;
    Err(match archive_err {
        Some(Error::Io(x)) if x.kind() == ErrorKind::NotFound
            => Error::NotFound(path.to_owned()),
        Some(x) => x,
        None => Error::NotFound(path.to_owned()),
    })
}

impl Vfs {
    pub fn new() -> Vfs {
        Vfs::with_config(VfsConfig::default())
    }
    pub fn with_config(config: VfsConfig) -> Vfs {
        Vfs { inner: Arc::new(RwLock::new(VfsInner {
            config,
            mounts: Vec::with_capacity(config.max_mounts),
        }))}
    }
    #[cfg(feature = "stdpaths")]
    pub fn with_standard_mounts(unixy_name: &str) -> Vfs {
        let mut ret = Vfs::new();
        stdpaths::do_standard_mounts(&mut ret, unixy_name);
        ret
    }
    fn read_lock(&self) -> RwLockReadGuard<'_, VfsInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write_lock(&self) -> RwLockWriteGuard<'_, VfsInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
    /// Mounts a directory or archive on top of everything already mounted.
    ///
    /// `path` is both where the source lives on the real filesystem and the
    /// key used to unmount it later. Archives are tried first, so a valid
    /// archive is never mistaken for anything else.
    pub fn mount(&mut self, path: &str) -> Result<()> {
        let mut this = self.write_lock();
        let limit = this.config.max_path;
        if path.len() >= limit {
            return Err(Error::path_too_long(path, path.len(), limit))
        }
        if this.mounts.iter().any(|x| x.path == path) {
            return Err(Error::AlreadyMounted(path.to_owned()))
        }
        if this.mounts.len() >= this.config.max_mounts {
            return Err(Error::CapacityExceeded(this.config.max_mounts))
        }
        let (kind, source) = open_source(path, limit)?;
        log::info!("mounted {:?} ({:?})", path, kind);
        this.mounts.push(Mount { path: path.to_owned(), kind, source });
        Ok(())
    }
    /// Removes the mount with exactly this path. Everything else keeps its
    /// relative order.
    pub fn unmount(&mut self, path: &str) -> Result<()> {
        let mut this = self.write_lock();
        match this.mounts.iter().position(|x| x.path == path) {
            Some(i) => {
                let mount = this.mounts.remove(i);
                log::info!("unmounted {:?} ({:?})", mount.path, mount.kind);
                Ok(())
            },
            None => Err(Error::NotMounted(path.to_owned())),
        }
    }
    /// Unmounts everything, newest first. Calling this on an empty table does
    /// nothing.
    pub fn teardown(&mut self) {
        self.write_lock().teardown();
    }
    /// Classifies `name` according to the newest mount that has anything by
    /// that name at all. Older mounts are not consulted once one answers,
    /// even if they have the other kind of node.
    pub fn node_kind(&self, name: &str) -> Option<NodeKind> {
        let this = self.read_lock();
        this.mounts.iter().rev().find_map(|x| x.source.node_kind(name))
    }
    pub fn exists(&self, name: &str) -> bool {
        let this = self.read_lock();
        this.mounts.iter().rev().any(|x| x.source.exists(name))
    }
    pub fn is_file(&self, name: &str) -> bool {
        self.node_kind(name) == Some(NodeKind::File)
    }
    pub fn is_directory(&self, name: &str) -> bool {
        self.node_kind(name) == Some(NodeKind::Directory)
    }
    /// Reads a whole file from the newest mount that has a *file* by that
    /// name. Unlike [`node_kind`](#method.node_kind), a mount holding a
    /// directory of that name is passed over.
    ///
    /// The buffer is the caller's; it outlives any unmount.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let this = self.read_lock();
        for mount in this.mounts.iter().rev() {
            if mount.source.is_file(name) {
                return mount.source.read(name)
            }
        }
        Err(Error::NotFound(name.to_owned()))
    }
    /// Number of active mounts.
    pub fn len(&self) -> usize { self.read_lock().mounts.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    /// Maximum number of simultaneous mounts.
    pub fn capacity(&self) -> usize { self.read_lock().config.max_mounts }
    pub fn config(&self) -> VfsConfig { self.read_lock().config }
    /// Active mounts, oldest first.
    pub fn mounts(&self) -> Vec<(String, MountKind)> {
        self.read_lock().mounts.iter()
            .map(|x| (x.path.clone(), x.kind))
            .collect()
    }
}
