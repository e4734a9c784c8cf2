//! Save pipeline: resolve, stage and promote every buffer of a context
//!
//! Saving runs in three phases:
//!
//! 1. every key is resolved against the destination root and checked for
//!    collisions (the same file twice, or a file where another key needs a
//!    directory); any problem here is reported before a single byte is
//!    written,
//! 2. every buffer is staged into a temporary file next to its destination,
//! 3. only if all staging succeeded, each staged file is renamed onto its
//!    destination, replacing whatever was there.
//!
//! Failures in phases 2 and 3 are collected for every file rather than
//! stopping at the first one.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::context::OutputContext;
use crate::error::{Error, PersistenceFailures, Result};

/// A buffer's resolved destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Destination key as registered in the context
    pub key: String,

    /// Absolute, lexically normalized destination path
    pub path: PathBuf,

    /// Size of the content in bytes
    pub bytes: usize,
}

/// Outcome of a successful save
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    /// Paths written, in context order
    pub written: Vec<PathBuf>,
}

/// Resolved, collision-free set of files ready to be persisted
pub struct SavePipeline<'a> {
    root: PathBuf,
    files: Vec<(PlannedFile, &'a str)>,
}

impl<'a> SavePipeline<'a> {
    /// Resolve every key of `context` under `root` and reject collisions
    pub fn prepare(context: &'a OutputContext, root: &Path) -> Result<Self> {
        let root = absolute_root(root)?;
        let mut files: Vec<(PlannedFile, &'a str)> = Vec::with_capacity(context.len());

        for (key, writer) in context.iter() {
            let path = resolve_destination(&root, key)?;
            if let Some((existing, claimed)) = files
                .iter()
                .find_map(|(file, _)| conflict(&file.path, &path).map(|p| (&file.key, p)))
            {
                return Err(Error::DestinationCollision {
                    key: key.to_string(),
                    existing: existing.clone(),
                    path: claimed.to_path_buf(),
                });
            }
            let content = writer.as_str();
            files.push((
                PlannedFile {
                    key: key.to_string(),
                    path,
                    bytes: content.len(),
                },
                content,
            ));
        }

        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().map(|(file, _)| file)
    }

    /// Stage then promote every file
    pub fn execute(self) -> Result<SaveReport> {
        info!(
            "Saving {} file(s) under {}",
            self.files.len(),
            self.root.display()
        );

        let mut failures = PersistenceFailures::default();
        let mut staged = Vec::with_capacity(self.files.len());
        for (file, content) in &self.files {
            match stage(&file.path, content) {
                Ok(temp) => staged.push((file, temp)),
                Err(err) => failures.push(&file.key, file.path.clone(), err),
            }
        }

        if !failures.is_empty() {
            // staged temp files are removed when `staged` drops
            warn!("Staging failed for {} file(s), nothing promoted", failures.len());
            return Err(Error::Persistence(failures));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (file, temp) in staged {
            match temp.persist(&file.path) {
                Ok(_) => {
                    debug!("Wrote {} ({} bytes)", file.path.display(), file.bytes);
                    written.push(file.path.clone());
                }
                Err(err) => failures.push(&file.key, file.path.clone(), err.error),
            }
        }

        if !failures.is_empty() {
            warn!(
                "Promoted {} file(s), {} failed",
                written.len(),
                failures.len()
            );
            return Err(Error::Persistence(failures));
        }

        info!("Saved {} file(s)", written.len());
        Ok(SaveReport { written })
    }
}

/// The contested path when `a` and `b` cannot both be files: they are equal,
/// or one would have to be a directory holding the other.
fn conflict<'p>(a: &'p Path, b: &'p Path) -> Option<&'p Path> {
    if b.starts_with(a) {
        Some(a)
    } else if a.starts_with(b) {
        Some(b)
    } else {
        None
    }
}

fn stage(path: &Path, content: &str) -> std::io::Result<NamedTempFile> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}

/// Make `root` absolute and remove `.`/`..` components
fn absolute_root(root: &Path) -> Result<PathBuf> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };

    let mut normalized = PathBuf::new();
    for component in root.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Resolve a destination key against an absolute root.
///
/// Keys are relative paths using `/` or `\` as separators; `..` may walk
/// above the root (e.g. `../Shared.cs`).
pub fn resolve_destination(root: &Path, key: &str) -> Result<PathBuf> {
    let invalid = |reason: &str| Error::InvalidDestination {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let relative = key.replace('\\', "/");
    if relative.trim().is_empty() {
        return Err(invalid("key is empty"));
    }
    if relative.starts_with('/') || Path::new(&relative).has_root() {
        return Err(invalid("key must be relative to the destination root"));
    }
    match relative.rsplit('/').next() {
        Some("") | Some(".") | Some("..") | None => {
            return Err(invalid("key does not name a file"));
        }
        _ => {}
    }

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if !path.pop() {
                    return Err(invalid("key walks above the filesystem root"));
                }
            }
            name => path.push(name),
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        absolute_root(Path::new("/out/Models")).unwrap()
    }

    #[test]
    fn test_resolve_plain_key() {
        assert_eq!(
            resolve_destination(&root(), "Person.cs").unwrap(),
            root().join("Person.cs")
        );
    }

    #[test]
    fn test_resolve_parent_navigation() {
        let path = resolve_destination(&root(), "..\\IDbConnectionFactory.cs").unwrap();
        assert_eq!(path, PathBuf::from("/out/IDbConnectionFactory.cs"));

        let path = resolve_destination(&root(), "./Sales/../Person.cs").unwrap();
        assert_eq!(path, root().join("Person.cs"));
    }

    #[test]
    fn test_resolve_nested_key() {
        let path = resolve_destination(&root(), "Sales/Order.cs").unwrap();
        assert_eq!(path, root().join("Sales").join("Order.cs"));
    }

    #[test]
    fn test_resolve_rejects_bad_keys() {
        for key in ["", "  ", "/etc/passwd", "Sales/", "Sales/..", "."] {
            let err = resolve_destination(&root(), key).unwrap_err();
            assert!(matches!(err, Error::InvalidDestination { .. }), "{key:?}");
        }
    }

    #[test]
    fn test_absolute_root_normalizes() {
        assert_eq!(
            absolute_root(Path::new("/out/./Models/../Models")).unwrap(),
            PathBuf::from("/out/Models")
        );
        assert!(absolute_root(Path::new("relative")).unwrap().is_absolute());
    }

    #[test]
    fn test_prepare_detects_collisions() {
        let mut ctx = OutputContext::new();
        ctx.get_or_create("Person.cs");
        ctx.get_or_create("Sales/../Person.cs");

        let err = SavePipeline::prepare(&ctx, Path::new("/out")).err().unwrap();
        match err {
            Error::DestinationCollision { key, existing, path } => {
                assert_eq!(key, "Sales/../Person.cs");
                assert_eq!(existing, "Person.cs");
                assert_eq!(path, PathBuf::from("/out/Person.cs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prepare_rejects_file_used_as_directory() {
        let mut ctx = OutputContext::new();
        ctx.get_or_create("Sales/Order.cs");
        ctx.get_or_create("Sales");

        let err = SavePipeline::prepare(&ctx, Path::new("/out")).err().unwrap();
        match err {
            Error::DestinationCollision { key, existing, path } => {
                assert_eq!(key, "Sales");
                assert_eq!(existing, "Sales/Order.cs");
                assert_eq!(path, PathBuf::from("/out/Sales"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prepare_allows_shared_name_prefixes() {
        let mut ctx = OutputContext::new();
        ctx.get_or_create("Sales.cs");
        ctx.get_or_create("Sales/Order.cs");
        ctx.get_or_create("SalesOrder.cs");

        assert_eq!(
            SavePipeline::prepare(&ctx, Path::new("/out")).unwrap().files().count(),
            3
        );
    }

    #[test]
    fn test_prepare_plans_in_context_order() {
        let mut ctx = OutputContext::new();
        ctx.get_or_create("b.cs").write_line("bb");
        ctx.get_or_create("a.cs").write_line("a");

        let pipeline = SavePipeline::prepare(&ctx, Path::new("/out")).unwrap();
        let planned: Vec<_> = pipeline.files().map(|f| (f.key.as_str(), f.bytes)).collect();
        assert_eq!(planned, vec![("b.cs", 3), ("a.cs", 2)]);
    }
}
