//! # Linker Module
//!
//! Hard-links the images of each bracket into one output directory so an
//! HDR tool can be pointed at them without copying any data.
//!
//! Links are named after the source file. A name that already exists in
//! the output directory is left alone and reported as skipped. A link that
//! fails is reported and the remaining images are still linked.

use crate::core::bracket::Bracket;
use crate::error::LinkError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to one image
#[derive(Debug)]
pub enum LinkOutcome {
    /// A new link was created at this path
    Linked(PathBuf),
    /// Something already exists at this path
    Skipped(PathBuf),
    /// The link at this path could not be created
    Failed { path: PathBuf, error: LinkError },
}

impl LinkOutcome {
    /// Path of the link in the output directory
    pub fn path(&self) -> &Path {
        match self {
            LinkOutcome::Linked(path) | LinkOutcome::Skipped(path) => path,
            LinkOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LinkOutcome::Failed { .. })
    }
}

/// Creates hard links for matched images inside `out_dir`
#[derive(Debug, Clone)]
pub struct BracketLinker {
    out_dir: PathBuf,
}

impl BracketLinker {
    /// Create the output directory (and parents) if needed
    pub fn create(out_dir: impl Into<PathBuf>) -> Result<Self, LinkError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|source| LinkError::CreateDirectory {
            path: out_dir.clone(),
            source,
        })?;
        Ok(Self { out_dir })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Link every image of `bracket`, one outcome per image in bracket order
    pub fn link(&self, bracket: &Bracket) -> Vec<LinkOutcome> {
        bracket
            .images
            .iter()
            .map(|image| self.link_file(&image.path, &image.name))
            .collect()
    }

    fn link_file(&self, source: &Path, name: &str) -> LinkOutcome {
        let target = self.out_dir.join(name);

        match fs::hard_link(source, &target) {
            Ok(()) => {
                debug!(from = %source.display(), to = %target.display(), "linked");
                LinkOutcome::Linked(target)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => LinkOutcome::Skipped(target),
            Err(source_err) => {
                warn!(from = %source.display(), error = %source_err, "link failed");
                LinkOutcome::Failed {
                    path: target.clone(),
                    error: LinkError::Link {
                        from: source.to_path_buf(),
                        to: target,
                        source: source_err,
                    },
                }
            }
        }
    }
}
