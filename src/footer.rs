//! The trailer that lets an archive ride along at the end of another file.
//!
//! A packaged executable is the executable's own bytes, then a tar archive,
//! then eight bytes: the tag `TAR\0` followed by a little-endian `u32` giving
//! the distance from the end of the file back to the first byte of the
//! archive. That distance includes the trailer itself.
//!
//! ```rust
//! # use overlay_vfs::footer;
//! # use std::io::Cursor;
//! let archive = vec![0u8; 1024]; // pretend this is a tar archive
//! let mut packaged = b"native code goes here".to_vec();
//! footer::append_archive(&mut packaged, &archive).unwrap();
//! let base = footer::read_footer(&mut Cursor::new(&packaged)).unwrap();
//! assert_eq!(base, Some(21));
//! ```

use std::{
    io, io::{ErrorKind, Read, Seek, SeekFrom, Write},
};

/// Sentinel at the start of the trailer.
pub const FOOTER_TAG: [u8; 4] = *b"TAR\0";
/// Length of the trailer in bytes.
pub const FOOTER_LEN: u64 = 8;

/// Writes `archive` followed by a trailer pointing back at it.
pub fn append_archive<W: Write>(mut out: W, archive: &[u8])
                                -> io::Result<()> {
    let distance = u32::try_from(archive.len() as u64 + FOOTER_LEN)
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput,
                                    "archive too large for a trailer"))?;
    out.write_all(archive)?;
    out.write_all(&FOOTER_TAG)?;
    out.write_all(&distance.to_le_bytes())?;
    Ok(())
}

/// Looks for a trailer at the end of `file`.
///
/// Returns the absolute offset where the archive begins, or `None` if there
/// is no trailer (or one that points before the start of the file).
pub fn read_footer<R: Read + Seek>(file: &mut R) -> io::Result<Option<u64>> {
    let len = file.seek(SeekFrom::End(0))?;
    if len < FOOTER_LEN {
        return Ok(None)
    }
    file.seek(SeekFrom::Start(len - FOOTER_LEN))?;
    let mut trailer = [0u8; FOOTER_LEN as usize];
    file.read_exact(&mut trailer)?;
    let (tag, distance) = trailer.split_at(4);
    if tag != FOOTER_TAG {
        return Ok(None)
    }
    let distance = u32::from_le_bytes([distance[0], distance[1],
                                       distance[2], distance[3]]);
    match len.checked_sub(distance as u64) {
        Some(base) => Ok(Some(base)),
        None => {
            log::debug!("trailer distance {} exceeds file length {}",
                        distance, len);
            Ok(None)
        },
    }
}
