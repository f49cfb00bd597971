//! Sequences strategy execution across a single file or an enumerated batch.
//!
//! Files are processed strictly one at a time; the original artifact is only
//! removed after the backend reports success, and a per-file failure inside
//! a folder batch never stops the remaining files.

use crate::backend::Backend;
use crate::enumerate;
use crate::error::Error;
use crate::filetypes::{self, Group, MASTER_MANIFEST, PACKAGE_EXT, THUMBNAIL_FILE};
use crate::request::{ConversionRequest, Input, Output};
use crate::strategy::{self, Strategy};
use kdam::{term::Colorizer, tqdm, BarExt, Column, RichProgress};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Converted,
    Packaged,
    Unpackaged,
    ThumbnailExtracted,
    Skipped,
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub packaged: usize,
    pub unpackaged: usize,
    pub thumbnails: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, action: Action) {
        match action {
            Action::Converted => self.converted += 1,
            Action::Packaged => self.packaged += 1,
            Action::Unpackaged => self.unpackaged += 1,
            Action::ThumbnailExtracted => self.thumbnails += 1,
            Action::Skipped => self.skipped += 1,
            Action::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.converted, "converted"),
            (self.packaged, "packaged"),
            (self.unpackaged, "unpackaged"),
            (self.thumbnails, "thumbnails extracted"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, word)| format!("{count} {word}"))
        .collect::<Vec<_>>();

        if parts.is_empty() {
            f.write_str("nothing to do")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

pub struct Orchestrator<'a> {
    backend: &'a dyn Backend,
    cancelled: Arc<AtomicBool>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(backend: &'a dyn Backend, cancelled: Arc<AtomicBool>) -> Self {
        Self { backend, cancelled }
    }

    pub fn run(&self, request: &ConversionRequest) -> Result<BatchSummary, Error> {
        let mut summary = BatchSummary::default();

        match &request.input {
            Input::File {
                path,
                group,
                extension,
            } => {
                let action = self.execute(
                    path,
                    *group,
                    extension,
                    &request.output,
                    request.keep_original,
                )?;
                log::info!("{} {}", label(action), path.display());
                summary.record(action);
            }
            Input::Folder { path, selector } => {
                let allowed = enumerate::allowed_extensions(selector, &request.output);
                let files = enumerate::candidates(path, &allowed)?;

                if files.is_empty() {
                    log::warn!("no matching files under {}.", path.display());
                    return Ok(summary);
                }

                let total = files.len();
                let mut pb = RichProgress::new(
                    tqdm!(total = total, unit = " file".to_owned(), dynamic_ncols = true),
                    vec![
                        Column::Animation,
                        Column::Percentage(0),
                        Column::Text("•".to_owned()),
                        Column::CountTotal,
                        Column::Text("•".to_owned()),
                        Column::ElapsedTime,
                    ],
                );

                for (index, file) in files.iter().enumerate() {
                    if self.cancelled.load(Ordering::SeqCst) {
                        pb.write(format!(
                            "  {} interrupted after {} of {} files",
                            "Cancelled".colorize("bold yellow"),
                            index,
                            total
                        ))?;
                        break;
                    }

                    pb.write(format!("current {} / total {}", index + 1, total))?;

                    let outcome = filetypes::resolve_group(&file.extension)
                        .ok_or_else(|| Error::UnsupportedInput(file.extension.clone()))
                        .and_then(|group| {
                            self.execute(
                                &file.path,
                                group,
                                &file.extension,
                                &request.output,
                                request.keep_original,
                            )
                        });

                    match outcome {
                        Ok(action) => {
                            pb.write(format!("{} {}", label(action), file.path.display()))?;
                            summary.record(action);
                        }
                        Err(error) => {
                            pb.write(format!(
                                "{} {} ({})",
                                label(Action::Failed),
                                file.path.display(),
                                error
                            ))?;
                            summary.record(Action::Failed);
                        }
                    }

                    pb.update(1)?;
                }

                eprintln!();
            }
        }

        Ok(summary)
    }

    fn execute(
        &self,
        path: &Path,
        group: Group,
        extension: &str,
        output: &Output,
        keep_original: bool,
    ) -> Result<Action, Error> {
        match strategy::select(group, extension, output)? {
            Strategy::Skip => Ok(Action::Skipped),
            Strategy::DirectConvert => {
                let target = path.with_extension(output.token());
                self.backend.convert(path, &target)?;
                self.remove_original(path, keep_original)?;
                Ok(Action::Converted)
            }
            Strategy::Package => {
                let stem = file_stem(path)?;
                let out_dir = path.parent().unwrap_or(Path::new(".")).join(stem);

                fs::create_dir_all(&out_dir)?;
                let manifest = self.backend.package(path, &out_dir)?;
                fs::rename(&manifest, out_dir.join(MASTER_MANIFEST))?;
                self.remove_original(path, keep_original)?;
                Ok(Action::Packaged)
            }
            Strategy::Unpackage => {
                let package_dir = path.parent().unwrap_or(Path::new("."));
                let name = package_dir
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or_else(|| {
                        Error::ConversionFailed(format!(
                            "cannot name output for {}.",
                            path.display()
                        ))
                    })?;
                let target = package_dir
                    .parent()
                    .unwrap_or(Path::new("."))
                    .join(format!("{}.{}", name, output.token()));

                self.backend.convert(path, &target)?;

                if !keep_original {
                    fs::remove_dir_all(package_dir)?;
                }

                Ok(Action::Unpackaged)
            }
            Strategy::ExtractThumbnail => {
                if extension == PACKAGE_EXT {
                    let target = path.parent().unwrap_or(Path::new(".")).join(THUMBNAIL_FILE);

                    // Already extracted on a previous run.
                    if target.exists() {
                        return Ok(Action::Skipped);
                    }

                    self.backend.extract_thumbnail(path, &target)?;
                } else {
                    self.backend.extract_thumbnail(path, &path.with_extension("jpg"))?;
                }

                Ok(Action::ThumbnailExtracted)
            }
        }
    }

    fn remove_original(&self, path: &Path, keep_original: bool) -> Result<(), Error> {
        if !keep_original {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

fn file_stem(path: &Path) -> Result<&str, Error> {
    path.file_stem().and_then(|stem| stem.to_str()).ok_or_else(|| {
        Error::ConversionFailed(format!("cannot name output for {}.", path.display()))
    })
}

fn label(action: Action) -> String {
    match action {
        Action::Converted => "  Converted".colorize("bold green"),
        Action::Packaged => "   Packaged".colorize("bold green"),
        Action::Unpackaged => " Unpackaged".colorize("bold green"),
        Action::ThumbnailExtracted => "  Thumbnail".colorize("bold green"),
        Action::Skipped => "    Skipped".colorize("bold yellow"),
        Action::Failed => "     Failed".colorize("bold red"),
    }
}
