//! Per-file type classification.
//!
//! Each file the walker visits is checked against the caller's ordered
//! type list. The first matching type wins; a file that matches nothing is
//! left out of every bucket, which is not an error.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::EngineError;
use crate::config::{Identification, IdentificationMode};

/// Classifies files into ordered per-type buckets.
///
/// Buckets are call-scoped: a classifier lives for exactly one walk and is
/// drained once the walk completes. Bucket order equals the caller's
/// type-list order, which defines load priority.
pub struct TypeClassifier {
    /// One search needle per type, in caller order.
    needles: Vec<String>,
    mode: IdentificationMode,
    buckets: Mutex<Vec<Vec<PathBuf>>>,
}

impl TypeClassifier {
    /// Creates a classifier for the given types and identification settings.
    pub fn new(types: &[String], identification: &Identification) -> Self {
        let needles = types
            .iter()
            .map(|ty| match identification.mode {
                IdentificationMode::Content => {
                    format!("{} {}", identification.identifier, ty.to_lowercase())
                }
                IdentificationMode::Filename => {
                    format!("{}{}", identification.identifier, ty.to_lowercase())
                }
            })
            .collect::<Vec<_>>();

        Self {
            buckets: Mutex::new(vec![Vec::new(); needles.len()]),
            mode: identification.mode,
            needles,
        }
    }

    /// Classifies one file, recording it under the first matching type.
    ///
    /// Returns the matched type index, or `None` when the file matches no
    /// configured type.
    pub async fn classify(&self, path: PathBuf) -> Result<Option<usize>, EngineError> {
        trace!("Checking file: {}", path.display());

        let matched = match self.mode {
            IdentificationMode::Content => self.match_content(&path).await?,
            IdentificationMode::Filename => self.match_filename(&path),
        };

        match matched {
            Some(index) => {
                self.buckets.lock()[index].push(path);
                Ok(Some(index))
            }
            None => {
                trace!("Skipping file: {}", path.display());
                Ok(None)
            }
        }
    }

    /// Content-tag mode: lower-cased file text must contain
    /// `<identifier> <type>`.
    async fn match_content(&self, path: &Path) -> Result<Option<usize>, EngineError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content.to_lowercase(),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                debug!("Skipping unreadable file {}: {}", path.display(), e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self
            .needles
            .iter()
            .position(|needle| content.contains(needle.as_str())))
    }

    /// Filename mode: lower-cased base name must contain
    /// `<identifier><type>`.
    fn match_filename(&self, path: &Path) -> Option<usize> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        self.needles
            .iter()
            .position(|needle| name.contains(needle.as_str()))
    }

    /// Drains the buckets into the final load order: every file of the
    /// first type before any file of the second, and so on.
    pub fn take_list(&self) -> Vec<String> {
        let buckets = std::mem::take(&mut *self.buckets.lock());
        buckets
            .into_iter()
            .flatten()
            .map(|path| path.to_string_lossy().into_owned())
            .collect()
    }
}
