//! Static registry of filetype groups, built once and never mutated.
//!
//! Extensions are stored lowercase in their canonical form; the alias table
//! (jpeg -> jpg, hls -> m3u8) is applied before any lookup.

use std::fmt;

/// Packaging manifest extension (HLS).
pub const PACKAGE_EXT: &str = "m3u8";

/// Canonical manifest name inside a package folder.
pub const MASTER_MANIFEST: &str = "master.m3u8";

/// Pseudo output type selecting thumbnail extraction.
pub const THUMBNAIL_TOKEN: &str = "thumbnail";

/// Fixed thumbnail name inside a package folder.
pub const THUMBNAIL_FILE: &str = "thumbnail.jpg";

const IMAGE: &[&str] = &["jpg", "png", "webp", "avif"];
const AUDIO: &[&str] = &["mp3", "wav", "flac", "m4a", "wma", "aac", "aiff", "ogg"];
const VIDEO: &[&str] = &["mp4", "mov", "gif", "mkv", "avi", "wmv", "webm", "m3u8"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Image,
    Audio,
    Video,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Image, Group::Audio, Group::Video];

    pub fn name(self) -> &'static str {
        match self {
            Group::Image => "image",
            Group::Audio => "audio",
            Group::Video => "video",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Group::Image => IMAGE,
            Group::Audio => AUDIO,
            Group::Video => VIDEO,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercases an extension and maps it to its canonical form.
pub fn normalize_alias(ext: &str) -> String {
    let ext = ext.to_ascii_lowercase();

    match ext.as_str() {
        "jpeg" => "jpg".to_owned(),
        "hls" => PACKAGE_EXT.to_owned(),
        _ => ext,
    }
}

/// Resolves a group name or an extension to its group.
pub fn resolve_group(token: &str) -> Option<Group> {
    let token = token.to_ascii_lowercase();

    if let Some(group) = Group::ALL.into_iter().find(|g| g.name() == token) {
        return Some(group);
    }

    let ext = normalize_alias(&token);
    Group::ALL
        .into_iter()
        .find(|g| g.extensions().contains(&ext.as_str()))
}

/// Whether an extension belongs to the union of all group extension sets.
pub fn is_supported_output(ext: &str) -> bool {
    let ext = normalize_alias(ext);
    Group::ALL
        .into_iter()
        .any(|g| g.extensions().contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_canonical_group() {
        for (alias, canonical) in [("jpeg", "jpg"), ("hls", "m3u8")] {
            assert_eq!(normalize_alias(alias), canonical);
            assert_eq!(resolve_group(alias), resolve_group(canonical));
        }
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(resolve_group("MKV"), Some(Group::Video));
        assert_eq!(resolve_group("Jpeg"), Some(Group::Image));
        assert_eq!(resolve_group("FLAC"), Some(Group::Audio));
    }

    #[test]
    fn group_names_resolve_directly() {
        assert_eq!(resolve_group("image"), Some(Group::Image));
        assert_eq!(resolve_group("audio"), Some(Group::Audio));
        assert_eq!(resolve_group("video"), Some(Group::Video));
    }

    #[test]
    fn unknown_tokens_resolve_to_nothing() {
        assert_eq!(resolve_group("xyz"), None);
        assert!(!is_supported_output("xyz"));
    }

    #[test]
    fn manifest_extension_is_a_supported_video_output() {
        assert_eq!(resolve_group(PACKAGE_EXT), Some(Group::Video));
        assert!(is_supported_output(PACKAGE_EXT));
        assert!(is_supported_output("hls"));
    }
}
