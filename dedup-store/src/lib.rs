//! Persisted set of links the bot has already published.
//!
//! Backed by a flat text file, one link per line, only ever appended to.
//! Duplicate lines are harmless: loading collapses them into a set.

use boltbot_core::{CoreError, ErrorExt, StorageError};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};


pub struct PostedStore {
    path: PathBuf,
    links: HashSet<String>,
}

impl PostedStore {
    /// Loads the history at `path`. A missing file is an empty history; an
    /// unreadable one is logged and also treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let links = match Self::load(&path) {
            Ok(links) => {
                info!(
                    "Loaded {} posted links from {}",
                    links.len(),
                    path.display()
                );
                links
            }
            Err(e) => {
                e.log_warn();
                HashSet::new()
            }
        };

        Self { path, links }
    }

    fn load(path: &Path) -> Result<HashSet<String>, CoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No history at {}, starting fresh", path.display());
                return Ok(HashSet::new());
            }
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link.trim())
    }

    /// Adds `link` to the history and appends it to the file. The in-memory
    /// set is updated even if the write fails.
    pub fn record(&mut self, link: &str) -> Result<(), CoreError> {
        let link = link.trim();
        self.links.insert(link.to_string());

        self.append_line(link).map_err(|e| {
            StorageError::WriteFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn append_line(&self, link: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", link)?;
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
