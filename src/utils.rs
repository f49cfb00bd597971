use std::{
    env,
    path::{Path, PathBuf},
};

/// Locates the ffmpeg binary in the working directory or on PATH.
pub fn find_ffmpeg() -> Option<PathBuf> {
    let bin = if cfg!(target_os = "windows") {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    };

    if Path::new(bin).exists() {
        return Some(PathBuf::from(bin));
    }

    let separator = if cfg!(target_os = "windows") {
        ';'
    } else {
        ':'
    };

    env::var("PATH")
        .ok()?
        .split(separator)
        .map(|dir| Path::new(dir).join(bin))
        .find(|candidate| candidate.exists())
}
