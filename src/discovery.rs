//! # Discovery Module
//!
//! Finds every filesystem entry a rename run may touch, *before* anything is changed.
//!
//! ## Search Roots
//!
//! A Visual Studio C++ solution usually looks like this:
//!
//! ```text
//! OldProj/                  <- level 0 (the working directory)
//!   OldProj.sln
//!   OldProj/                <- level 1
//!     OldProj.vcxproj
//!     OldProj.rc
//!     OldProj/              <- level 2 (rare, but nested templates do it)
//! ```
//!
//! We scan three levels, each non-recursively:
//!
//! 1.  The root directory itself (`*`).
//! 2.  The directory that will be called `Name` once level 0 is renamed (`Name/*`).
//! 3.  The directory that will be called `Name` inside that one (`Name/Name/*`).
//!
//! Because the nested roots are addressed by their *new* name, we resolve them against
//! the planned names of the level above. This lets us take a complete snapshot up front
//! instead of depending on the order in which renames happen.
//!
//! Hidden entries (leading `.`) are skipped, as a shell `*` would.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, bail};
use log::{debug, trace, warn};
use crate::system::{DirEntryInfo, FileSystemOps};

/// Extensions that, appended to the old project name, form the files whose contents we rewrite.
pub const PROJECT_FILE_EXTENSIONS: [&str; 5] = [
    ".sln",
    ".rc",
    ".vcxproj",
    ".vcxproj.filters",
    ".vcxproj.user",
];

/// Deepest search level (`Name/Name/*`).
pub const MAX_SEARCH_LEVEL: u8 = 2;

/// An entry found under one of the search roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path as it exists *now*, before any mutation.
    pub path: PathBuf,
    /// The entry's base name.
    pub name: String,
    /// 0 for the root, 1 for `Name/*`, 2 for `Name/Name/*`.
    pub level: u8,
    pub is_dir: bool,
}

/// The five recognized project file names for `keyword`.
pub fn recognized_project_files(keyword: &str) -> Vec<String> {
    PROJECT_FILE_EXTENSIONS
        .iter()
        .map(|ext| format!("{keyword}{ext}"))
        .collect()
}

/// Exact match against one of the recognized project file names.
pub fn is_recognized_project_file(base_name: &str, keyword: &str) -> bool {
    recognized_project_files(keyword).iter().any(|f| f == base_name)
}

/// Base name after replacing every occurrence of `keyword` with `new_name`.
pub fn renamed_base_name(base_name: &str, keyword: &str, new_name: &str) -> String {
    base_name.replace(keyword, new_name)
}

/// Snapshots all candidates under the three search roots.
///
/// Candidates come back grouped by level (0, 1, 2) and in name order within a level.
pub fn discover_candidates(
    fs: &impl FileSystemOps,
    root: &Path,
    keyword: &str,
    new_name: &str,
) -> Result<Vec<Candidate>> {
    if !fs.is_dir(root) {
        bail!("Root directory {:?} does not exist or is not a directory", root);
    }

    let mut candidates = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut current_dir = Some(root.to_path_buf());

    for level in 0..=MAX_SEARCH_LEVEL {
        let Some(dir) = current_dir.take() else { break };

        if !visited.insert(fs.canonicalize(&dir)) {
            debug!("Search root {:?} was already scanned; stopping descent", dir);
            break;
        }

        debug!("Scanning search root {} at {:?}", level, dir);
        let entries = fs
            .list_dir(&dir)
            .with_context(|| format!("Failed to list directory {:?}", dir))?;

        let level_candidates = collect_level(&entries, level);
        current_dir = next_search_root(&level_candidates, keyword, new_name);
        candidates.extend(level_candidates);
    }

    debug!("Discovered {} candidates", candidates.len());
    Ok(candidates)
}

fn collect_level(entries: &[DirEntryInfo], level: u8) -> Vec<Candidate> {
    let mut out = Vec::new();
    for entry in entries {
        let Some(name) = entry.path.file_name() else { continue };
        let Some(name) = name.to_str() else {
            warn!("Skipping {:?}: file name is not valid UTF-8", entry.path);
            continue;
        };
        if name.starts_with('.') {
            trace!("Skipping hidden entry {:?}", entry.path);
            continue;
        }
        out.push(Candidate {
            path: entry.path.clone(),
            name: name.to_string(),
            level,
            is_dir: entry.is_dir,
        });
    }
    out
}

/// Picks the directory at this level that will be named `new_name` after renaming.
///
/// An entry already called `new_name` wins over one that is only renamed into it,
/// because that rename would conflict and leave the existing directory in place.
fn next_search_root(level: &[Candidate], keyword: &str, new_name: &str) -> Option<PathBuf> {
    if new_name.is_empty() {
        return None;
    }
    let mut dirs = level.iter().filter(|c| c.is_dir);
    let existing = dirs.clone().find(|c| c.name == new_name && !c.name.contains(keyword));
    existing
        .or_else(|| dirs.find(|c| renamed_base_name(&c.name, keyword, new_name) == new_name))
        .map(|c| c.path.clone())
}
