use std::{
    env,
    path::{Path as StdPath, PathBuf as StdPathBuf},
};

use super::*;

/// Mounts `path`, logging instead of failing. Returns true if it mounted.
fn try_mount(vfs: &mut Vfs, path: &StdPath, what: &str) -> bool {
    let path_str = match path.to_str() {
        Some(x) => x,
        None => {
            log::warn!("{:?}: not UTF-8, can't mount it as {}", path, what);
            return false
        },
    };
    match vfs.mount(path_str) {
        Ok(()) => {
            log::info!("{} found: {:?}", what, path);
            true
        },
        Err(Error::NotFound(_)) => false,
        Err(x) => {
            log::debug!("{:?}: {}", path, x);
            false
        },
    }
}

fn try_data_dir(vfs: &mut Vfs, us_dir: &StdPath) {
    // First, try Data (capital D), then data (lowercase D)
    for name in ["Data", "data"] {
        if try_mount(vfs, &us_dir.join(name), "data directory") {
            return
        }
    }
    log::info!("No data directory found under {:?}", us_dir);
}

fn get_us_dir(exe: Option<&StdPath>) -> StdPathBuf {
    match exe.and_then(StdPath::parent) {
        Some(x) if !x.as_os_str().is_empty() => x.to_owned(),
        _ => ".".into(),
    }
}

/// Where to look for a loose data directory, given the directory holding
/// our executable.
fn data_home(mut us_dir: StdPathBuf, unixy_name: &str) -> StdPathBuf {
    if us_dir.file_name().map(|x| x == "bin").unwrap_or(false) {
        // We're in a `bin` directory.
        // For: .../bin/our_exe
        // Use: .../share/unixy_name/data
        us_dir.pop();
        us_dir.push("share");
        us_dir.push(unixy_name);
    }
    else if us_dir.parent().and_then(StdPath::file_name)
        .map(|x| x == "target").unwrap_or(false) {
            // We're in a `target` directory, being run from where Cargo
            // built us.
            // For .../target/.../our_exe
            // Use: .../data
            us_dir.pop();
            us_dir.pop();
        }
    us_dir
}

pub(crate) fn do_standard_mounts(vfs: &mut Vfs, unixy_name: &str) {
    let exe = match env::current_exe() {
        Ok(x) => Some(x),
        Err(x) => {
            log::warn!("Couldn't get the path to our own executable! {:?}",
                       x);
            log::warn!("Assuming it's in the working directory.");
            None
        },
    };
    // Lowest priority: an archive packaged onto the end of the executable.
    if let Some(exe) = exe.as_deref() {
        if !try_mount(vfs, exe, "packaged archive") {
            log::info!("No archive packaged into {:?}", exe);
        }
    }
    // Loose files next to the executable override the packaged ones.
    let us_dir = get_us_dir(exe.as_deref());
    try_data_dir(vfs, &data_home(us_dir, unixy_name));
    if cfg!(target_family="unix") {
        let home: StdPathBuf = env::var_os("HOME")
            .filter(|x| !x.is_empty()).map(StdPathBuf::from)
            .unwrap_or_else(|| "/".into());
        let mut xdg_data_home: StdPathBuf = env::var_os("XDG_DATA_HOME")
            .filter(|x| !x.is_empty()).map(StdPathBuf::from)
            .unwrap_or_else(|| {
                let mut ret = home.to_owned();
                ret.push(".local");
                ret.push("share");
                ret
            });
        xdg_data_home.push(unixy_name);
        try_mount(vfs, &xdg_data_home, "user data directory");
    }
}
