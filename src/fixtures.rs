//! Builders shared by the unit tests.

use std::fs;

use tar::{EntryType, Header};

pub(crate) enum Item<'a> {
    File(&'a str, &'a [u8]),
    /// Name should end with `/`, the way real tar tools write directories.
    Dir(&'a str),
    /// A symlink pointing at `main.lua`.
    Link(&'a str),
    /// A regular file whose name need not be UTF-8.
    Raw(&'a [u8], &'a [u8]),
}

/// Builds a tar archive, writing each name into the header verbatim.
pub(crate) fn tar_bytes(items: &[Item]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for item in items {
        let mut header = Header::new_gnu();
        let (name, data): (&[u8], &[u8]) = match *item {
            Item::File(name, data) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                (name.as_bytes(), data)
            },
            Item::Raw(name, data) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                (name, data)
            },
            Item::Dir(name) => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                (name.as_bytes(), &b""[..])
            },
            Item::Link(name) => {
                header.set_entry_type(EntryType::Symlink);
                header.set_mode(0o777);
                header.set_link_name("main.lua").unwrap();
                (name.as_bytes(), &b""[..])
            },
        };
        // `set_path` would eat a trailing slash, so fill the field by hand
        let field = &mut header.as_old_mut().name;
        field[..name.len()].copy_from_slice(name);
        header.set_size(data.len() as u64);
        header.set_cksum();
        builder.append(&header, data).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Writes `data` to `name` inside `dir` and returns the full path.
pub(crate) fn write_file(dir: &tempfile::TempDir, name: &str, data: &[u8])
                         -> String {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path.to_str().unwrap().to_owned()
}
