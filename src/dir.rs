use crate::*;
use crate::error::alloc_buffer;

use std::{
    fs, fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path as StdPath,
};

/// A real directory, presented as a mount.
///
/// Nothing is held open between calls. Every query glues the root onto the
/// requested name and looks at the result directly.
pub(crate) struct Source {
    root: String,
    max_path: usize,
}

/// Classifies a path by trying to open it, first as a directory and then as
/// a file. This avoids `stat`, which is painfully slow on some of the
/// platforms we care about (DOS-era ones in particular).
fn probe(path: &StdPath) -> Option<NodeKind> {
    if fs::read_dir(path).is_ok() {
        Some(NodeKind::Directory)
    }
    else if File::open(path).is_ok() {
        Some(NodeKind::File)
    }
    else {
        None
    }
}

impl Source {
    pub fn new(root: &str, max_path: usize) -> Result<Source> {
        match probe(StdPath::new(root)) {
            Some(NodeKind::Directory) => Ok(Source {
                root: root.to_owned(),
                max_path,
            }),
            _ => Err(Error::NotFound(root.to_owned())),
        }
    }
    /// Joins the root and `name`, inserting a `/` only if the root doesn't
    /// already end in one. The joined path, a separator and a terminator
    /// must fit in the path bound.
    fn full_path(&self, name: &str) -> Result<String> {
        let len = self.root.len() + name.len() + 2;
        if len > self.max_path {
            return Err(Error::path_too_long(name, len, self.max_path))
        }
        let mut ret = String::with_capacity(len);
        ret.push_str(&self.root);
        if !self.root.ends_with('/') { ret.push('/') }
        ret.push_str(name);
        Ok(ret)
    }
}

impl VfsSource for Source {
    fn node_kind(&self, name: &str) -> Option<NodeKind> {
        match self.full_path(name) {
            Ok(path) => probe(StdPath::new(&path)),
            Err(x) => {
                log::debug!("{:?}: {}", self.root, x);
                None
            },
        }
    }
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.full_path(name)?;
        let mut file = File::open(&path)?;
        let len = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;
        let len = usize::try_from(len)
            .map_err(|_| Error::AllocationFailure(usize::MAX))?;
        let mut buf = alloc_buffer(len)?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}
