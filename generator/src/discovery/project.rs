use std::path::Path;

use crate::discovery::finder::{matches_pattern, path_has_component, TreeListing};

pub const UNKNOWN_PROJECT: &str = "Unknown";

/// Names the project after its SigmaStudio `.dspproj` file.
pub fn discover_project_name(listing: &TreeListing, root: &Path, excluded_dir_name: &str) -> String {
    let projects: Vec<&Path> = listing
        .files
        .iter()
        .map(|path| path.as_path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| matches_pattern(name, "*.dspproj"))
        })
        .collect();

    projects
        .iter()
        .find(|path| !path_has_component(root, path, excluded_dir_name))
        .or_else(|| projects.first())
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}
