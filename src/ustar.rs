//! Cursor-style reader over a sequential tar stream.
//!
//! This is deliberately small: it reads the header under the cursor, steps
//! to the next header, seeks to an arbitrary header position, and reads the
//! data belonging to the header under the cursor. Field decoding is done by
//! the `tar` crate's `Header`; checksum validation and cursor handling are
//! done here, since the archive mount needs to jump back to a remembered
//! header position long after the initial scan.

use crate::NodeKind;

use std::{
    io, io::{ErrorKind, Read, Seek, SeekFrom},
};

pub(crate) const BLOCK_SIZE: u64 = 512;

/// Byte range of the checksum field inside a header block.
const CKSUM_RANGE: std::ops::Range<usize> = 148..156;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    /// Raw name bytes, exactly as stored.
    pub name: Vec<u8>,
    pub size: u64,
    pub kind: NodeKind,
}

pub(crate) struct TarReader<R> {
    inner: R,
    /// Absolute offset of the first header within `inner`.
    base: u64,
    /// Cursor, relative to `base`.
    pos: u64,
}

impl<R: Read + Seek> TarReader<R> {
    pub fn new(inner: R) -> TarReader<R> {
        TarReader { inner, base: 0, pos: 0 }
    }
    pub fn base(&self) -> u64 { self.base }
    /// Moves the start of the archive to `base` and rewinds onto it.
    pub fn set_base(&mut self, base: u64) -> io::Result<()> {
        self.base = base;
        self.rewind()
    }
    pub fn position(&self) -> u64 { self.pos }
    pub fn get_mut(&mut self) -> &mut R { &mut self.inner }
    pub fn seek(&mut self, pos: u64) -> io::Result<()> {
        let abs = self.base.checked_add(pos).ok_or_else(out_of_range)?;
        self.inner.seek(SeekFrom::Start(abs))?;
        self.pos = pos;
        Ok(())
    }
    pub fn rewind(&mut self) -> io::Result<()> {
        self.seek(0)
    }
    /// Reads the header under the cursor without moving the cursor.
    ///
    /// `Ok(None)` means end of archive: either a null record or a stream
    /// that ends before a whole header block. A block that is present but
    /// isn't a valid header comes back as `InvalidData`.
    pub fn read_header(&mut self) -> io::Result<Option<Header>> {
        let mut block = [0u8; BLOCK_SIZE as usize];
        match self.inner.read_exact(&mut block) {
            Ok(()) => (),
            Err(x) if x.kind() == ErrorKind::UnexpectedEof => {
                self.seek(self.pos)?;
                return Ok(None)
            },
            Err(x) => return Err(x),
        }
        self.seek(self.pos)?;
        parse_header(&block)
    }
    /// Steps over `header` (which must be the header under the cursor) and
    /// its padded data.
    pub fn next(&mut self, header: &Header) -> io::Result<()> {
        let next = header.size.div_ceil(BLOCK_SIZE)
            .checked_add(1)
            .and_then(|x| x.checked_mul(BLOCK_SIZE))
            .and_then(|x| x.checked_add(self.pos))
            .ok_or_else(out_of_range)?;
        self.seek(next)
    }
    /// Fills `buf` with data of the entry under the cursor, then puts the
    /// cursor back on its header.
    pub fn read_data(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let header_pos = self.pos;
        self.inner.seek(SeekFrom::Start(self.base + header_pos + BLOCK_SIZE))?;
        let res = self.inner.read_exact(buf);
        self.seek(header_pos)?;
        res
    }
}

fn parse_header(block: &[u8; BLOCK_SIZE as usize])
                -> io::Result<Option<Header>> {
    let header = tar::Header::from_byte_slice(block);
    if header.as_old().cksum[0] == 0 {
        return Ok(None)
    }
    let stored = header.cksum().map_err(invalid)?;
    let computed: u32 = block.iter().enumerate()
        .map(|(i, &b)| if CKSUM_RANGE.contains(&i) { b' ' as u32 }
             else { b as u32 })
        .sum();
    if stored != computed {
        return Err(io::Error::new(ErrorKind::InvalidData,
                                  "tar header checksum mismatch"))
    }
    let size = header.entry_size().map_err(invalid)?;
    let entry_type = header.entry_type();
    let kind = if entry_type.is_file() { NodeKind::File }
    else if entry_type.is_dir() { NodeKind::Directory }
    else { NodeKind::Other };
    let name = header.path_bytes().into_owned();
    Ok(Some(Header { name, size, kind }))
}

fn invalid(x: io::Error) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, x)
}

fn out_of_range() -> io::Error {
    io::Error::new(ErrorKind::InvalidData, "tar entry runs past any sane size")
}
