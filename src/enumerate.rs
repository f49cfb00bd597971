//! Recursive folder enumeration for batch requests.

use crate::error::Error;
use crate::filetypes::{self, PACKAGE_EXT};
use crate::request::{Output, Selector};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Canonical (alias-normalized, lowercase) extension.
    pub extension: String,
}

/// Extensions admitted for a folder request: the selector's set, minus the
/// requested output extension, minus the packaging manifest unless it was
/// the explicitly requested input type.
pub fn allowed_extensions(selector: &Selector, output: &Output) -> BTreeSet<String> {
    let mut allowed: BTreeSet<String> = selector.extensions().into_iter().collect();

    if let Output::Filetype(ext) = output {
        allowed.remove(ext);
    }

    if !selector.is_extension(PACKAGE_EXT) {
        allowed.remove(PACKAGE_EXT);
    }

    allowed
}

/// One-shot recursive capture of matching files, ordered by path. A second
/// call re-walks the folder and may observe a different set.
pub fn candidates(folder: &Path, allowed: &BTreeSet<String>) -> Result<Vec<CandidateFile>, Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder) {
        let entry = entry.map_err(std::io::Error::from)?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        let extension = filetypes::normalize_alias(extension);

        if allowed.contains(&extension) {
            files.push(CandidateFile { path, extension });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filetypes::Group;
    use std::fs;

    fn names(files: &[CandidateFile], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn yields_matching_files_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mkv", "a.mov", "c.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let allowed = allowed_extensions(
            &Selector::Group(Group::Video),
            &Output::Filetype("mp4".to_owned()),
        );
        let files = candidates(dir.path(), &allowed).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.mov", "b.mkv"]);
    }

    #[test]
    fn walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/d.avi"), b"").unwrap();
        fs::write(dir.path().join("a.mov"), b"").unwrap();

        let allowed = allowed_extensions(
            &Selector::Group(Group::Video),
            &Output::Filetype("mp4".to_owned()),
        );
        let files = candidates(dir.path(), &allowed).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.mov", "sub/d.avi"]);
    }

    #[test]
    fn never_yields_the_output_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.mkv"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let allowed = allowed_extensions(
            &Selector::Group(Group::Video),
            &Output::Filetype("mp4".to_owned()),
        );
        let files = candidates(dir.path(), &allowed).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["b.mkv"]);
    }

    #[test]
    fn manifest_is_excluded_unless_explicitly_requested() {
        let video = allowed_extensions(
            &Selector::Group(Group::Video),
            &Output::Filetype("mp4".to_owned()),
        );
        assert!(!video.contains(PACKAGE_EXT));

        let manifests = allowed_extensions(
            &Selector::Extension(PACKAGE_EXT.to_owned()),
            &Output::Filetype("mp4".to_owned()),
        );
        assert!(manifests.contains(PACKAGE_EXT));
    }

    #[test]
    fn alias_extensions_match_their_canonical_set() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpeg", "b.JPG", "c.png"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let allowed = allowed_extensions(
            &Selector::Group(Group::Image),
            &Output::Filetype("webp".to_owned()),
        );
        let files = candidates(dir.path(), &allowed).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.jpeg", "b.JPG", "c.png"]);
        assert!(files.iter().all(|f| f.extension != "jpeg"));
    }

    #[test]
    fn single_extension_selector_admits_only_that_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mkv", "b.mov"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let allowed = allowed_extensions(
            &Selector::Extension("mkv".to_owned()),
            &Output::Filetype("mp4".to_owned()),
        );
        let files = candidates(dir.path(), &allowed).unwrap();

        assert_eq!(names(&files, dir.path()), vec!["a.mkv"]);
    }
}
