//! This is a read-only, layered virtual filesystem for games. Sources (real
//! directories, or tar archives) are mounted one on top of another, and
//! together they look like a single tree. Callers ask whether a name exists,
//! what it is, and what's in it, without caring which source answers.
//!
//! Everything is synchronous and blocking. A [`Vfs`](struct.Vfs.html) is a
//! handle to a shared, lock-protected mount table; clone it to share it.
//!
//! # Overview
//!
//! ```rust,no_run
//! # use overlay_vfs::Vfs;
//! let mut vfs = Vfs::new();
//! vfs.mount("game.tar")?;   // the shipped data
//! vfs.mount("devdata/")?;   // loose files from a developer's checkout
//! let script = vfs.read("main.lua")?;
//! # Ok::<(), overlay_vfs::Error>(())
//! ```
//!
//! ## Mounts
//!
//! Later mounts shadow earlier ones. Every query walks the mounts newest
//! first, and the first mount that has *anything* by the requested name is
//! the one that answers. Given tree A:
//!
//! - `sprites/` (a directory)
//! - `main.lua`
//!
//! And tree B:
//!
//! - `sprites` (a file)
//! - `main.lua`
//!
//! If you mount A and then B, `main.lua` comes from B, and `sprites` is a
//! file: A's directory of the same name is hidden entirely. The one
//! exception is [`read`](struct.Vfs.html#method.read), which skips over
//! mounts that have a *directory* by the requested name and keeps looking
//! for a file.
//!
//! When you mount a path, it is first tried as a tar archive and then as a
//! directory. The mount path is also the mount's identity: mounting the same
//! path twice is an error, and [`unmount`](struct.Vfs.html#method.unmount)
//! takes the same path back.
//!
//! ## Names
//!
//! Names are relative, `/`-separated, and compared byte for byte. There is
//! no normalization: `gfx/hero.png` and `gfx//hero.png` are different names
//! as far as an archive is concerned, though a directory mount will let the
//! operating system decide.
//!
//! ## Packaged executables
//!
//! A tar archive may be appended to the end of another file, typically the
//! game's own executable, followed by a small trailer that points back at
//! where the archive starts. Such a file can be mounted like any other
//! archive. See the [`footer`](footer/index.html) module.

mod config;
pub use config::{VfsConfig, DEFAULT_MAX_MOUNTS, DEFAULT_MAX_PATH};

mod error;
pub use error::{Error, Result};

pub mod footer;

mod vfs;
pub use vfs::{MountKind, NodeKind, Vfs};
pub(crate) use vfs::VfsSource;

#[cfg(feature = "dir")]
mod dir;

#[cfg(feature = "archive")]
mod ustar;
#[cfg(feature = "archive")]
mod archive;

#[cfg(test)]
mod fixtures;
