//! Turns raw positional tokens into a structured conversion request.
//!
//! The input token is overloaded: a plain file path, or a folder path with a
//! `/:<group-or-ext>` selector that the shell may hand over as two separate
//! tokens. The grammar is resolved into a typed sum here, before any
//! validation, so nothing downstream re-inspects raw strings.

use crate::error::Error;
use crate::filetypes::{self, Group, THUMBNAIL_TOKEN};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Group(Group),
    Extension(String),
}

impl Selector {
    /// All extensions the selector admits, in canonical form.
    pub fn extensions(&self) -> Vec<String> {
        match self {
            Selector::Group(group) => group
                .extensions()
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
            Selector::Extension(ext) => vec![ext.clone()],
        }
    }

    pub fn is_extension(&self, ext: &str) -> bool {
        matches!(self, Selector::Extension(e) if e == ext)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File {
        path: PathBuf,
        group: Group,
        extension: String,
    },
    Folder {
        path: PathBuf,
        selector: Selector,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Filetype(String),
    Thumbnail,
}

impl Output {
    pub fn token(&self) -> &str {
        match self {
            Output::Filetype(ext) => ext,
            Output::Thumbnail => THUMBNAIL_TOKEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: Input,
    pub output: Output,
    pub keep_original: bool,
}

/// Logical input argument, split out before any validation.
#[derive(Debug, PartialEq, Eq)]
enum RawInput {
    Plain(String),
    FilteredFolder { folder: String, selector: String },
}

pub fn parse(
    input: Option<&str>,
    rest: &[String],
    keep_original: bool,
) -> Result<ConversionRequest, Error> {
    let first = input.ok_or(Error::MissingInput)?.replace('\\', "/");

    let (raw, rest) = tokenize(first, rest);

    let output = rest.first().ok_or(Error::MissingOutput)?;
    if let Some(extra) = rest.get(1) {
        return Err(Error::Usage(format!("unexpected argument \"{extra}\".")));
    }

    let input = resolve_input(raw)?;
    let output = resolve_output(output)?;

    Ok(ConversionRequest {
        input,
        output,
        keep_original,
    })
}

fn tokenize(first: String, rest: &[String]) -> (RawInput, &[String]) {
    if let Some((folder, selector)) = first.rsplit_once("/:") {
        return (
            RawInput::FilteredFolder {
                folder: folder.to_owned(),
                selector: selector.to_owned(),
            },
            rest,
        );
    }

    match rest.first().and_then(|token| token.strip_prefix(':')) {
        Some(selector) => (
            RawInput::FilteredFolder {
                folder: first.trim_end_matches('/').to_owned(),
                selector: selector.to_owned(),
            },
            &rest[1..],
        ),
        None => (RawInput::Plain(first), rest),
    }
}

fn resolve_input(raw: RawInput) -> Result<Input, Error> {
    match raw {
        RawInput::Plain(path) => {
            let path = PathBuf::from(path);

            if !path.exists() {
                return Err(Error::NotFound(path.display().to_string()));
            }

            if path.is_dir() {
                return Err(Error::Usage(
                    "folder inputs need a filetype selector, e.g. <folder>/:video.".to_owned(),
                ));
            }

            let extension = match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) => filetypes::normalize_alias(ext),
                None => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    return Err(Error::UnsupportedInput(name));
                }
            };

            let group = filetypes::resolve_group(&extension)
                .ok_or_else(|| Error::UnsupportedInput(extension.clone()))?;

            Ok(Input::File {
                path,
                group,
                extension,
            })
        }
        RawInput::FilteredFolder { folder, selector } => {
            let path = PathBuf::from(folder);

            if !path.exists() {
                return Err(Error::NotFound(path.display().to_string()));
            }

            if !path.is_dir() {
                return Err(Error::Usage(format!(
                    "filetype selectors only apply to folders ({} is a file).",
                    path.display()
                )));
            }

            let selector = resolve_selector(&selector)?;

            Ok(Input::Folder { path, selector })
        }
    }
}

fn resolve_selector(token: &str) -> Result<Selector, Error> {
    let lowered = token.to_ascii_lowercase();

    if let Some(group) = Group::ALL.into_iter().find(|g| g.name() == lowered) {
        return Ok(Selector::Group(group));
    }

    let ext = filetypes::normalize_alias(&lowered);
    match filetypes::resolve_group(&ext) {
        Some(_) => Ok(Selector::Extension(ext)),
        None => Err(Error::UnsupportedInput(lowered)),
    }
}

fn resolve_output(token: &str) -> Result<Output, Error> {
    let ext = filetypes::normalize_alias(token.trim_start_matches('.'));

    if ext == THUMBNAIL_TOKEN {
        return Ok(Output::Thumbnail);
    }

    if filetypes::is_supported_output(&ext) {
        Ok(Output::Filetype(ext))
    } else {
        Err(Error::UnsupportedOutput(ext))
    }
}
