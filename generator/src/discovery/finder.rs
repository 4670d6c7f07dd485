use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of searching the project tree for one export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Unique(PathBuf),
    /// Several export-directory hits; the first one is used.
    Preferred { chosen: PathBuf, all: Vec<PathBuf> },
    Ambiguous(Vec<PathBuf>),
    Missing,
}

/// Directory and file listing of a project tree, sorted for stable results.
#[derive(Debug, Default)]
pub struct TreeListing {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

pub fn list_tree(root: &Path) -> anyhow::Result<TreeListing> {
    let mut listing = TreeListing::default();
    walk(root, &mut listing)?;
    listing.dirs.sort();
    listing.files.sort();
    Ok(listing)
}

fn walk(dir: &Path, listing: &mut TreeListing) -> anyhow::Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspecting {}", path.display()))?;
        if file_type.is_dir() {
            listing.dirs.push(path.clone());
            walk(&path, listing)?;
        } else if file_type.is_file() {
            listing.files.push(path);
        }
    }
    Ok(())
}

pub fn matches_pattern(file_name: &str, pattern: &str) -> bool {
    match pattern.strip_prefix('*') {
        Some(suffix) => file_name.ends_with(suffix),
        None => file_name == pattern,
    }
}

/// True when `name` is a directory component of `path` below `root`.
pub fn path_has_component(root: &Path, path: &Path, name: &str) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|component| component.as_os_str() == name)
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
}

/// Locates export documents, preferring files inside export directories.
pub struct FileFinder<'a> {
    root: &'a Path,
    listing: TreeListing,
    export_dir_name: &'a str,
    excluded_dir_name: &'a str,
}

impl<'a> FileFinder<'a> {
    pub fn new(
        root: &'a Path,
        export_dir_name: &'a str,
        excluded_dir_name: &'a str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            root,
            listing: list_tree(root)?,
            export_dir_name,
            excluded_dir_name,
        })
    }

    fn has_component(&self, path: &Path, name: &str) -> bool {
        path_has_component(self.root, path, name)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.has_component(path, self.excluded_dir_name)
    }

    fn in_export_dir(&self, path: &Path) -> bool {
        path.parent()
            .is_some_and(|parent| self.has_component(parent, self.export_dir_name))
    }

    pub fn listing(&self) -> &TreeListing {
        &self.listing
    }

    pub fn find(&self, pattern: &str) -> Candidate {
        let export_dirs: Vec<&PathBuf> = self
            .listing
            .dirs
            .iter()
            .filter(|dir| file_name(dir) == self.export_dir_name && !self.is_excluded(dir))
            .collect();

        let mut hits: Vec<PathBuf> = self
            .listing
            .files
            .iter()
            .filter(|file| {
                file.parent()
                    .is_some_and(|parent| export_dirs.iter().any(|dir| dir.as_path() == parent))
                    && matches_pattern(file_name(file), pattern)
            })
            .cloned()
            .collect();

        if hits.is_empty() {
            hits = self
                .listing
                .files
                .iter()
                .filter(|file| !self.is_excluded(file) && matches_pattern(file_name(file), pattern))
                .cloned()
                .collect();
        }

        match hits.len() {
            0 => Candidate::Missing,
            1 => Candidate::Unique(hits.remove(0)),
            _ => {
                let exported: Vec<PathBuf> = hits
                    .iter()
                    .filter(|hit| self.in_export_dir(hit))
                    .cloned()
                    .collect();
                match exported.len() {
                    0 => Candidate::Ambiguous(hits),
                    1 => Candidate::Unique(exported[0].clone()),
                    _ => Candidate::Preferred {
                        chosen: exported[0].clone(),
                        all: hits,
                    },
                }
            }
        }
    }
}
