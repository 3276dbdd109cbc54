use crate::*;
use crate::error::alloc_buffer;
use crate::ustar::{Header, TarReader};

use std::{
    fs::File,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Index storage starts this big and doubles whenever it fills.
const INITIAL_INDEX_CAPACITY: usize = 16;

/// Hash used to index archive entries. (djb2, xor flavor.)
///
/// It only has to be cheap and stable; every hit is confirmed by comparing
/// the real name, so collisions cost a seek, not correctness.
pub(crate) fn name_hash(name: &[u8]) -> u32 {
    name.iter().fold(5381u32, |hash, &b| {
        (hash << 5).wrapping_add(hash) ^ b as u32
    })
}

/// Directory entries are stored with a trailing `/`; names are looked up
/// without one.
fn normalized(name: &[u8]) -> &[u8] {
    match name.split_last() {
        Some((b'/', rest)) => rest,
        _ => name,
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    hash: u32,
    pos: u64,
}

/// A tar archive, presented as a mount.
///
/// The archive is scanned once when mounted. After that, finding a name is a
/// walk over `(hash, position)` pairs plus one header read per hash hit.
pub(crate) struct Source {
    path: String,
    reader: Mutex<TarReader<File>>,
    index: Vec<IndexEntry>,
}

impl Source {
    pub fn new(path: &str) -> Result<Source> {
        let file = File::open(path)?;
        let mut reader = TarReader::new(file);
        match reader.read_header() {
            Ok(Some(_)) => (),
            Ok(None) | Err(_) => {
                // Not a tar archive at the start. Maybe it's been appended
                // to something else.
                let base = match footer::read_footer(reader.get_mut())? {
                    Some(x) => x,
                    None => return Err(Error::malformed(
                        path, "no tar header and no archive trailer")),
                };
                reader.set_base(base)?;
                match reader.read_header() {
                    Ok(Some(_)) => (),
                    Ok(None) | Err(_) => return Err(Error::malformed(
                        path, "archive trailer points at no tar header")),
                }
                log::debug!("{:?}: archive found {} bytes in", path,
                            reader.base());
            },
        }
        let index = scan(path, &mut reader)?;
        log::debug!("{:?}: indexed {} entries", path, index.len());
        Ok(Source {
            path: path.to_owned(),
            reader: Mutex::new(reader),
            index,
        })
    }
    fn lock(&self) -> MutexGuard<'_, TarReader<File>> {
        self.reader.lock().unwrap_or_else(PoisonError::into_inner)
    }
    /// Finds `name` and leaves `reader` positioned on its header. The first
    /// entry in archive order wins.
    fn find(&self, reader: &mut TarReader<File>, name: &str)
            -> Option<Header> {
        let name = name.as_bytes();
        let hash = name_hash(name);
        for entry in self.index.iter().filter(|x| x.hash == hash) {
            let header = match reader.seek(entry.pos)
                .and_then(|_| reader.read_header()) {
                    Ok(Some(x)) => x,
                    Ok(None) => continue,
                    Err(x) => {
                        log::debug!("{:?}: header at {}: {}", self.path,
                                    entry.pos, x);
                        continue
                    },
                };
            if normalized(&header.name) == name {
                return Some(header)
            }
        }
        None
    }
}

/// Walks the whole archive from its start, recording where every header is.
/// A malformed header ends the walk the same way a null record does.
fn scan(path: &str, reader: &mut TarReader<File>)
        -> Result<Vec<IndexEntry>> {
    let mut index = Vec::new();
    index.try_reserve_exact(INITIAL_INDEX_CAPACITY)
        .map_err(|_| Error::AllocationFailure(INITIAL_INDEX_CAPACITY))?;
    reader.rewind()?;
    loop {
        let header = match reader.read_header() {
            Ok(Some(x)) => x,
            Ok(None) => break,
            Err(x) => {
                log::warn!("{:?}: stopped indexing at {}: {}", path,
                           reader.position(), x);
                break
            },
        };
        if index.len() == index.capacity() {
            let more = index.capacity();
            index.try_reserve_exact(more)
                .map_err(|_| Error::AllocationFailure(more * 2))?;
        }
        index.push(IndexEntry {
            hash: name_hash(normalized(&header.name)),
            pos: reader.position(),
        });
        if let Err(x) = reader.next(&header) {
            log::warn!("{:?}: stopped indexing after {:?}: {}", path,
                       String::from_utf8_lossy(&header.name), x);
            break
        }
    }
    Ok(index)
}

impl VfsSource for Source {
    fn node_kind(&self, name: &str) -> Option<NodeKind> {
        let mut reader = self.lock();
        self.find(&mut reader, name).map(|x| x.kind)
    }
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut reader = self.lock();
        let header = self.find(&mut reader, name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        let len = usize::try_from(header.size)
            .map_err(|_| Error::AllocationFailure(usize::MAX))?;
        let mut buf = alloc_buffer(len)?;
        reader.read_data(&mut buf)?;
        Ok(buf)
    }
}
