/// Writes generated files only when their content changes
///
/// Every file gets a "generated, do not edit" banner. A file whose content
/// already matches is left alone, keeping its modification time so build
/// tools downstream do not rebuild needlessly.

use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One generated file
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedUnit {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Banner-prefixing, change-tracking file writer
#[derive(Debug)]
pub struct OutputWriter {
    banner: String,
    changed: Vec<PathBuf>,
    dry_run: bool,
}

impl OutputWriter {
    /// `generator` is named in the banner of every written file
    pub fn new(generator: &str) -> Self {
        Self {
            banner: format!("// Code generated by {}; DO NOT EDIT.\n\n", generator),
            changed: Vec::new(),
            dry_run: false,
        }
    }

    /// Record what would change without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Final file text for `content`
    pub fn with_banner(&self, content: &str) -> String {
        format!("{}{}", self.banner, content)
    }

    /// Write `content` to `path` if it differs from what is there.
    ///
    /// Returns whether the file changed. A missing file counts as empty.
    pub fn write(&mut self, path: &Path, content: &str) -> Result<bool> {
        let new = self.with_banner(content);
        let orig = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if orig == new {
            debug!(path = %path.display(), "unchanged");
            return Ok(false);
        }

        if !self.dry_run {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &new)?;
        }
        debug!(path = %path.display(), dry_run = self.dry_run, "rewritten");
        self.changed.push(path.to_path_buf());
        Ok(true)
    }

    /// Write a generated unit
    pub fn write_unit(&mut self, unit: &GeneratedUnit) -> Result<bool> {
        self.write(&unit.path, &unit.content)
    }

    /// Paths rewritten so far, in write order
    pub fn changed(&self) -> &[PathBuf] {
        &self.changed
    }

    pub fn into_changed(self) -> Vec<PathBuf> {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_banner_once_then_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out_generated.go");
        let mut writer = OutputWriter::new("optgenc");

        assert!(writer.write(&path, "package at\n").unwrap());
        assert!(!writer.write(&path, "package at\n").unwrap());
        assert_eq!(writer.changed(), &[path.clone()]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "// Code generated by optgenc; DO NOT EDIT.\n\npackage at\n"
        );

        // A fresh run over the same tree reports nothing
        let mut rerun = OutputWriter::new("optgenc");
        assert!(!rerun.write(&path, "package at\n").unwrap());
        assert!(rerun.changed().is_empty());
    }

    #[test]
    fn test_changed_content_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, "stale").unwrap();
        let mut writer = OutputWriter::new("optgenc");
        assert!(writer.write(&path, "package a\n").unwrap());
        assert!(fs::read_to_string(&path).unwrap().ends_with("package a\n"));
    }

    #[test]
    fn test_dry_run_leaves_disk_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        let mut writer = OutputWriter::new("optgenc").dry_run(true);
        assert!(writer.write_unit(&GeneratedUnit::new(&path, "package a\n")).unwrap());
        assert!(!path.exists());
        assert_eq!(writer.into_changed(), vec![path]);
    }
}
