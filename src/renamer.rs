//! # Renamer Logic
//!
//! This module contains the core business logic of vsrename. It is responsible for:
//! 1. Turning a discovery snapshot into a deterministic plan (`plan_rename`).
//! 2. Rewriting recognized project files and renaming entries (`execute_plan`).
//! 3. Collecting per-entry outcomes into a `RenameReport` instead of dying on the first fault.
//!
//! Execution runs deepest search level first, so a directory is only renamed after
//! everything beneath it has been handled through its original path.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, bail};
use log::{debug, info, warn, error};
use serde::Serialize;
use crate::discovery::{self, Candidate};
use crate::error::RenameError;
use crate::invariant_ppt::*;
use crate::system::FileSystemOps;
use crate::text::TextDocument;

const INVARIANT_SAME_DIR: &str = "Rename must keep the entry in its directory";
const INVARIANT_NO_KEYWORD: &str = "Rewritten project file must not contain the old name";

/// Everything a run needs. Built from CLI flags and/or the interactive prompts.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// The keyword to search for (old project name).
    pub old_name: String,
    /// The replacement (new project name).
    pub new_name: String,
    /// Directory containing the solution. Defaults to the current directory.
    pub root: PathBuf,
    /// Compute and report, but do not modify anything.
    pub dry_run: bool,
    /// Stop at the first failed action.
    pub fail_fast: bool,
}

impl RenameConfig {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            root: PathBuf::from("."),
            dry_run: false,
            fail_fast: false,
        }
    }
}

/// What will happen to one candidate.
#[derive(Debug, Clone)]
pub struct PlannedAction {
    pub candidate: Candidate,
    /// Contents will have the old name replaced.
    pub rewrite: bool,
    /// New path, if the base name changes.
    pub rename_to: Option<PathBuf>,
}

/// Actions in execution order. Candidates needing nothing are left out.
#[derive(Debug, Default)]
pub struct RenamePlan {
    pub actions: Vec<PlannedAction>,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn rewrite_count(&self) -> usize {
        self.actions.iter().filter(|a| a.rewrite).count()
    }

    pub fn rename_count(&self) -> usize {
        self.actions.iter().filter(|a| a.rename_to.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Rewrite,
    Rename,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rewrite {
    pub path: PathBuf,
    pub replacements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Renamed {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub action: ActionKind,
    /// `io`, `decode` or `conflict`.
    pub kind: &'static str,
    pub message: String,
}

/// Outcome of a run. In a dry run, `rewritten` and `renamed` describe what *would* happen.
#[derive(Debug, Default, Serialize)]
pub struct RenameReport {
    pub old_name: String,
    pub new_name: String,
    pub dry_run: bool,
    pub rewritten: Vec<Rewrite>,
    pub renamed: Vec<Renamed>,
    pub failures: Vec<Failure>,
    /// Entries left under their old name because their contents could not be rewritten.
    pub skipped: Vec<PathBuf>,
    /// Set when `fail_fast` stopped the run early.
    pub aborted: bool,
}

impl RenameReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, path: &Path, action: ActionKind, err: RenameError) {
        error!("{:?} failed: {}", action, err);
        self.failures.push(Failure {
            path: path.to_path_buf(),
            action,
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}

/// The main entry point: snapshot, plan, execute.
pub fn run(config: &RenameConfig, fs: &impl FileSystemOps) -> Result<RenameReport> {
    let plan = plan_rename(config, fs)?;
    Ok(execute_plan(&plan, config, fs))
}

/// Builds the full plan from a discovery snapshot. Does not touch the file system beyond listing.
pub fn plan_rename(config: &RenameConfig, fs: &impl FileSystemOps) -> Result<RenamePlan> {
    let old = config.old_name.as_str();
    let new = config.new_name.as_str();

    if new.contains(['/', '\\']) {
        bail!("New project name {:?} must not contain a path separator", new);
    }
    if new == "." || new == ".." {
        bail!("New project name {:?} is not a valid file name", new);
    }
    if old.is_empty() {
        warn!("Old project name is empty: every entry will match");
    }

    let candidates = discovery::discover_candidates(fs, &config.root, old, new)?;
    let mut actions: Vec<PlannedAction> = candidates
        .into_iter()
        .filter_map(|c| plan_candidate(c, old, new))
        .collect();

    // Stable: name order is kept within a level
    actions.sort_by_key(|a| Reverse(a.candidate.level));

    let plan = RenamePlan { actions };
    info!(
        "Planned {} rewrites and {} renames under {:?}",
        plan.rewrite_count(),
        plan.rename_count(),
        config.root
    );
    Ok(plan)
}

fn plan_candidate(candidate: Candidate, old: &str, new: &str) -> Option<PlannedAction> {
    if old == new {
        return None;
    }

    let rewrite = !candidate.is_dir && discovery::is_recognized_project_file(&candidate.name, old);

    let mut rename_to = None;
    if candidate.name.contains(old) {
        let new_base = discovery::renamed_base_name(&candidate.name, old, new);
        if new_base.is_empty() || new_base == "." || new_base == ".." {
            warn!("Not renaming {:?}: the new name {:?} is not a valid file name", candidate.path, new_base);
        } else {
            let target = candidate.path.with_file_name(&new_base);
            assert_invariant(target.parent() == candidate.path.parent(), INVARIANT_SAME_DIR, Some("Planner"));
            rename_to = Some(target);
        }
    }

    if !rewrite && rename_to.is_none() {
        return None;
    }
    Some(PlannedAction { candidate, rewrite, rename_to })
}

/// Executes a plan, collecting outcomes. Never panics on I/O faults.
pub fn execute_plan(plan: &RenamePlan, config: &RenameConfig, fs: &impl FileSystemOps) -> RenameReport {
    let mut report = RenameReport {
        old_name: config.old_name.clone(),
        new_name: config.new_name.clone(),
        dry_run: config.dry_run,
        ..Default::default()
    };

    for action in &plan.actions {
        let path = &action.candidate.path;

        if action.rewrite {
            match rewrite_project_file(fs, path, &config.old_name, &config.new_name, config.dry_run) {
                Ok(0) => debug!("{:?} has no occurrences of {:?}", path, config.old_name),
                Ok(replacements) => {
                    info!("Rewrote {:?} ({} replacements)", path, replacements);
                    report.rewritten.push(Rewrite { path: path.clone(), replacements });
                }
                Err(e) => {
                    report.record_failure(path, ActionKind::Rewrite, e);
                    if config.fail_fast {
                        report.aborted = true;
                        break;
                    }
                    // Renamed, it would no longer be recognized and a re-run could not fix it
                    if action.rename_to.is_some() {
                        warn!("Not renaming {:?}: its contents still hold {:?}", path, config.old_name);
                        report.skipped.push(path.clone());
                    }
                    continue;
                }
            }
        }

        if let Some(target) = &action.rename_to {
            match rename_entry(fs, path, target, config.dry_run) {
                Ok(()) => {
                    info!("Renamed {:?} -> {:?}", path, target);
                    report.renamed.push(Renamed { from: path.clone(), to: target.clone() });
                }
                Err(e) => {
                    report.record_failure(path, ActionKind::Rename, e);
                    if config.fail_fast {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }
    }

    if report.aborted {
        warn!("Stopped at the first failure; the project is partially renamed");
    }
    report
}

/// Reads, replaces and (unless `dry_run`) rewrites one project file.
///
/// Returns the number of replacements. Files without occurrences are left untouched.
fn rewrite_project_file(
    fs: &impl FileSystemOps,
    path: &Path,
    old: &str,
    new: &str,
    dry_run: bool,
) -> Result<usize, RenameError> {
    let bytes = fs.read_file(path).map_err(|e| RenameError::io(path, e))?;
    let decode_error = |reason| RenameError::Decode { path: path.to_path_buf(), reason };
    let mut doc = TextDocument::decode(&bytes).map_err(decode_error)?;

    let replacements = doc.replace_all(old, new).map_err(decode_error)?;
    if replacements == 0 {
        return Ok(0);
    }
    if !old.is_empty() && !new.contains(old) {
        assert_invariant(!doc.contains(old), INVARIANT_NO_KEYWORD, Some("Renamer"));
    }

    if !dry_run {
        fs.write_file_atomic(path, &doc.encode())
            .map_err(|e| RenameError::io(path, e))?;
    }
    Ok(replacements)
}

fn rename_entry(fs: &impl FileSystemOps, from: &Path, to: &Path, dry_run: bool) -> Result<(), RenameError> {
    // On case-insensitive file systems a case-only rename "exists" already
    if fs.exists(to) && !fs.is_same_entry(from, to) {
        return Err(RenameError::Conflict { from: from.to_path_buf(), to: to.to_path_buf() });
    }
    if dry_run {
        return Ok(());
    }
    fs.rename(from, to).map_err(|e| RenameError::io(from, e))
}

/// Prints the plan in a human-readable form (used by `--dry-run`).
pub fn print_plan(plan: &RenamePlan, config: &RenameConfig) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                   What vsrename Will Do");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  {:?} -> {:?} in {:?}", config.old_name, config.new_name, config.root);

    if plan.is_empty() {
        println!();
        println!("✓ Nothing to do! No entry contains {:?}.", config.old_name);
        println!();
        return;
    }

    let rewrites: Vec<&PlannedAction> = plan.actions.iter().filter(|a| a.rewrite).collect();
    if !rewrites.is_empty() {
        println!();
        println!("  REWRITING {} project files:", rewrites.len());
        for a in rewrites {
            println!("    ~ {}", a.candidate.path.display());
        }
    }

    let renames: Vec<(&Path, &Path)> = plan
        .actions
        .iter()
        .filter_map(|a| a.rename_to.as_deref().map(|to| (a.candidate.path.as_path(), to)))
        .collect();
    if !renames.is_empty() {
        println!();
        println!("  RENAMING {} entries:", renames.len());
        for (from, to) in renames {
            println!("    {} → {}", from.display(), to.display());
        }
    }

    println!();
    println!("───────────────────────────────────────────────────────────────");
    println!();
    println!("This is a preview. Run again without --dry-run to apply changes.");
    println!();
}

/// Renders the report for `--json`.
pub fn report_json(report: &RenameReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Prints the final summary of a run.
pub fn print_report(report: &RenameReport) {
    println!();
    println!("───────────────────────────────────────────────────────────────");
    println!(
        "  {} files rewritten, {} entries renamed, {} failures",
        report.rewritten.len(),
        report.renamed.len(),
        report.failures.len()
    );

    if !report.failures.is_empty() {
        println!();
        for f in &report.failures {
            println!("    ✕ [{}] {}", f.kind, f.message);
        }
        if !report.skipped.is_empty() {
            println!();
            println!("  Kept {} entries under their old name so a re-run can finish them:", report.skipped.len());
            for p in &report.skipped {
                println!("    - {}", p.display());
            }
        }
        println!();
        if report.aborted {
            println!("Stopped at the first failure. Some entries were not processed.");
        }
        println!("Fix the problems above and run again; finished entries are skipped.");
    } else if report.rewritten.is_empty() && report.renamed.is_empty() {
        println!();
        println!("✓ Nothing to do!");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariant_ppt::contract_test;
    use crate::system::RealFileSystem;
    use crate::system::mock::MockFileSystem;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn config(old: &str, new: &str) -> RenameConfig {
        RenameConfig { root: PathBuf::from("/p"), ..RenameConfig::new(old, new) }
    }

    fn solution_fs() -> MockFileSystem {
        MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/OldProj.sln", "Project(\"{8BC9}\") = \"OldProj\", \"OldProj\\OldProj.vcxproj\"\r\n")
            .with_file("/p/README.md", "OldProj readme")
            .with_dir("/p/OldProj")
            .with_file("/p/OldProj/OldProj.vcxproj", "<RootNamespace>OldProj</RootNamespace>")
            .with_file("/p/OldProj/OldProj.vcxproj.filters", "<ClInclude Include=\"OldProj.h\" />")
            .with_file("/p/OldProj/OldProj.vcxproj.user", "<Project />")
            .with_file("/p/OldProj/OldProj.rc", "\"OldProj.ico\"")
            .with_file("/p/OldProj/OldProj.h", "#pragma once // OldProj")
            .with_file("/p/OldProj/main.cpp", "#include \"OldProj.h\"")
    }

    #[test]
    fn test_full_solution_rename() {
        let fs = solution_fs();
        let report = run(&config("OldProj", "NewProj"), &fs).unwrap();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(
            fs.contents("/p/NewProj.sln").as_deref(),
            Some("Project(\"{8BC9}\") = \"NewProj\", \"NewProj\\NewProj.vcxproj\"\r\n")
        );
        assert_eq!(
            fs.contents("/p/NewProj/NewProj.vcxproj").as_deref(),
            Some("<RootNamespace>NewProj</RootNamespace>")
        );
        assert_eq!(
            fs.contents("/p/NewProj/NewProj.vcxproj.filters").as_deref(),
            Some("<ClInclude Include=\"NewProj.h\" />")
        );
        assert_eq!(fs.contents("/p/NewProj/NewProj.rc").as_deref(), Some("\"NewProj.ico\""));

        // Only recognized project files get their contents rewritten
        assert_eq!(fs.contents("/p/NewProj/NewProj.h").as_deref(), Some("#pragma once // OldProj"));
        assert_eq!(fs.contents("/p/NewProj/main.cpp").as_deref(), Some("#include \"OldProj.h\""));
        assert_eq!(fs.contents("/p/README.md").as_deref(), Some("OldProj readme"));

        // .vcxproj.user had no occurrence: renamed but never written
        assert!(fs.exists(Path::new("/p/NewProj/NewProj.vcxproj.user")));
        assert!(!fs.writes.lock().unwrap().iter().any(|p| p.ends_with("OldProj.vcxproj.user")));

        assert!(fs.paths().iter().all(|p| !p.to_string_lossy().contains("OldProj")));
        assert_eq!(report.rewritten.len(), 4);
        assert_eq!(report.renamed.len(), 7);
    }

    #[test]
    fn test_children_are_renamed_before_their_directory() {
        let fs = solution_fs();
        run(&config("OldProj", "NewProj"), &fs).unwrap();

        let renames = fs.renames.lock().unwrap();
        let dir_index = renames.iter().position(|(from, _)| from == Path::new("/p/OldProj")).unwrap();
        let child_index = renames
            .iter()
            .position(|(from, _)| from == Path::new("/p/OldProj/OldProj.rc"))
            .unwrap();
        assert!(child_index < dir_index);
    }

    #[test]
    fn test_same_names_change_nothing() {
        let fs = solution_fs();
        let report = run(&config("OldProj", "OldProj"), &fs).unwrap();

        assert!(report.is_success());
        assert!(fs.writes.lock().unwrap().is_empty());
        assert!(fs.renames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_absent_keyword_changes_nothing() {
        let fs = solution_fs();
        let report = run(&config("Missing", "NewProj"), &fs).unwrap();

        assert!(report.rewritten.is_empty() && report.renamed.is_empty());
        assert!(fs.writes.lock().unwrap().is_empty());
        assert!(fs.renames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let fs = solution_fs();
        run(&config("OldProj", "NewProj"), &fs).unwrap();
        let writes = fs.writes.lock().unwrap().len();
        let renames = fs.renames.lock().unwrap().len();

        let second = run(&config("OldProj", "NewProj"), &fs).unwrap();

        assert!(second.rewritten.is_empty() && second.renamed.is_empty());
        assert_eq!(fs.writes.lock().unwrap().len(), writes);
        assert_eq!(fs.renames.lock().unwrap().len(), renames);
    }

    #[test]
    fn test_conflict_keeps_old_name_and_continues() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/NewProj.sln", "already here")
            .with_file("/p/OldProj.sln", "Project(\"OldProj\")")
            .with_file("/p/OldProj_notes.txt", "");

        let report = run(&config("OldProj", "NewProj"), &fs).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, "conflict");
        assert_eq!(report.failures[0].action, ActionKind::Rename);
        // Contents were rewritten even though the rename failed
        assert_eq!(fs.contents("/p/OldProj.sln").as_deref(), Some("Project(\"NewProj\")"));
        assert_eq!(fs.contents("/p/NewProj.sln").as_deref(), Some("already here"));
        assert!(fs.exists(Path::new("/p/NewProj_notes.txt")));
        assert!(!report.aborted);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/NewProj.sln", "already here")
            .with_file("/p/OldProj.sln", "Project(\"OldProj\")")
            .with_file("/p/OldProj_notes.txt", "");
        let cfg = RenameConfig { fail_fast: true, ..config("OldProj", "NewProj") };

        let report = run(&cfg, &fs).unwrap();

        assert!(report.aborted);
        assert_eq!(report.failures.len(), 1);
        assert!(fs.exists(Path::new("/p/OldProj_notes.txt")));
    }

    #[test]
    fn test_io_fault_is_reported_per_entry() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/OldProj.rc", "OldProj")
            .with_locked("/p/OldProj.rc")
            .with_file("/p/OldProj.sln", "OldProj");

        let report = run(&config("OldProj", "NewProj"), &fs).unwrap();

        let kinds: Vec<(&str, ActionKind)> = report.failures.iter().map(|f| (f.kind, f.action)).collect();
        assert_eq!(kinds, vec![("io", ActionKind::Rewrite)]);
        assert_eq!(report.skipped, vec![PathBuf::from("/p/OldProj.rc")]);
        assert!(fs.exists(Path::new("/p/OldProj.rc")));
        assert_eq!(fs.contents("/p/NewProj.sln").as_deref(), Some("NewProj"));
    }

    #[test]
    fn test_failed_rewrite_keeps_old_name_for_rerun() {
        // UTF-16 BOM followed by an odd number of bytes cannot be decoded
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_bytes("/p/OldProj.rc", &[0xFF, 0xFE, b'O', 0x00, b'l'])
            .with_file("/p/OldProj_notes.txt", "");

        let first = run(&config("OldProj", "NewProj"), &fs).unwrap();
        assert_eq!(first.failures.len(), 1);
        assert_eq!(first.failures[0].kind, "decode");
        assert_eq!(first.skipped, vec![PathBuf::from("/p/OldProj.rc")]);
        assert!(fs.exists(Path::new("/p/NewProj_notes.txt")));

        // Still recognized on the next run, so it is retried instead of silently forgotten
        let second = run(&config("OldProj", "NewProj"), &fs).unwrap();
        assert_eq!(second.failures.len(), 1);
        assert_eq!(second.failures[0].action, ActionKind::Rewrite);
        assert!(fs.exists(Path::new("/p/OldProj.rc")));
        assert!(!fs.exists(Path::new("/p/NewProj.rc")));
    }

    #[test]
    fn test_ansi_resource_script_is_rewritten_and_renamed() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_bytes("/p/OldProj.rc", b"\"\xA9 2019\", \"OldProj\"\r\n");

        let report = run(&config("OldProj", "NewProj"), &fs).unwrap();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(fs.bytes("/p/NewProj.rc"), Some(b"\"\xA9 2019\", \"NewProj\"\r\n".to_vec()));
    }

    #[test]
    fn test_three_level_solution_rename() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/Old.sln", "Old")
            .with_dir("/p/Old")
            .with_file("/p/Old/Old.vcxproj", "<Name>Old</Name>")
            .with_dir("/p/Old/Old")
            .with_file("/p/Old/Old/Old.rc", "\"Old.ico\"")
            .with_file("/p/Old/Old/Old_icon.ico", "");

        let report = run(&config("Old", "New"), &fs).unwrap();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(fs.contents("/p/New/New/New.rc").as_deref(), Some("\"New.ico\""));
        assert!(fs.exists(Path::new("/p/New/New/New_icon.ico")));
        assert_eq!(fs.contents("/p/New/New.vcxproj").as_deref(), Some("<Name>New</Name>"));
        assert_eq!(fs.contents("/p/New.sln").as_deref(), Some("New"));
        assert!(fs.paths().iter().all(|p| !p.to_string_lossy().contains("Old")));

        // Deepest level first: each rename still addresses the original tree
        let renames = fs.renames.lock().unwrap();
        let froms: Vec<&Path> = renames.iter().map(|(from, _)| from.as_path()).collect();
        assert_eq!(
            froms,
            vec![
                Path::new("/p/Old/Old/Old.rc"),
                Path::new("/p/Old/Old/Old_icon.ico"),
                Path::new("/p/Old/Old"),
                Path::new("/p/Old/Old.vcxproj"),
                Path::new("/p/Old"),
                Path::new("/p/Old.sln"),
            ]
        );
    }

    #[test]
    fn test_dot_names_are_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Old"), "").unwrap();

        for bad in [".", ".."] {
            let cfg = RenameConfig { root: tmp.path().to_path_buf(), ..RenameConfig::new("Old", bad) };
            assert!(run(&cfg, &RealFileSystem).is_err());
        }
        assert!(tmp.path().join("Old").exists());
    }

    #[test]
    fn test_case_only_rename_does_not_clobber_other_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::write(root.join("proj.sln"), "x").unwrap();
        std::fs::write(root.join("PROJ.sln"), "unrelated").unwrap();
        if std::fs::read_dir(root).unwrap().count() < 2 {
            // Case-insensitive volume: both names are one file
            return;
        }

        let cfg = RenameConfig { root: root.to_path_buf(), ..RenameConfig::new("proj", "PROJ") };
        let report = run(&cfg, &RealFileSystem).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, "conflict");
        assert_eq!(std::fs::read_to_string(root.join("PROJ.sln")).unwrap(), "unrelated");
        assert_eq!(std::fs::read_to_string(root.join("proj.sln")).unwrap(), "x");
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let fs = solution_fs();
        let cfg = RenameConfig { dry_run: true, ..config("OldProj", "NewProj") };

        let report = run(&cfg, &fs).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.rewritten.len(), 4);
        assert_eq!(report.renamed.len(), 7);
        assert!(fs.writes.lock().unwrap().is_empty());
        assert!(fs.renames.lock().unwrap().is_empty());
        assert!(fs.exists(Path::new("/p/OldProj/OldProj.rc")));
    }

    #[test]
    fn test_path_separator_in_new_name_is_rejected() {
        let fs = solution_fs();
        assert!(run(&config("OldProj", "a/b"), &fs).is_err());
        assert!(fs.renames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_directory_named_like_project_file_is_not_rewritten() {
        let fs = MockFileSystem::new().with_dir("/p").with_dir("/p/OldProj.sln");
        let plan = plan_rename(&config("OldProj", "NewProj"), &fs).unwrap();

        assert_eq!(plan.rewrite_count(), 0);
        assert_eq!(plan.rename_count(), 1);
    }

    #[test]
    fn test_report_serializes_failure_kind() {
        let fs = MockFileSystem::new()
            .with_dir("/p")
            .with_file("/p/NewProj.sln", "")
            .with_file("/p/OldProj.sln", "");
        let report = run(&config("OldProj", "NewProj"), &fs).unwrap();

        let json: serde_json::Value = serde_json::from_str(&report_json(&report).unwrap()).unwrap();
        assert_eq!(json["failures"][0]["kind"], "conflict");
        assert_eq!(json["failures"][0]["action"], "rename");
        assert_eq!(json["old_name"], "OldProj");
        assert_eq!(json["skipped"], serde_json::json!([]));
    }

    #[test]
    fn test_invariants_are_checked() {
        let fs = solution_fs();
        run(&config("OldProj", "NewProj"), &fs).unwrap();
        contract_test("full solution rename", &[INVARIANT_SAME_DIR, INVARIANT_NO_KEYWORD]);
    }

    #[test]
    fn test_example_scenario_on_disk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir(root.join("OldProj")).unwrap();
        std::fs::write(root.join("OldProj").join("OldProj.sln"), "Project(\"OldProj\")").unwrap();
        std::fs::write(root.join("OldProj_notes.txt"), "notes").unwrap();

        let cfg = RenameConfig { root: root.to_path_buf(), ..RenameConfig::new("OldProj", "NewProj") };
        let report = run(&cfg, &RealFileSystem).unwrap();

        assert!(report.is_success(), "{:?}", report.failures);
        let sln = root.join("NewProj").join("NewProj.sln");
        assert_eq!(std::fs::read_to_string(sln).unwrap(), "Project(\"NewProj\")");
        assert_eq!(std::fs::read_to_string(root.join("NewProj_notes.txt")).unwrap(), "notes");
        assert!(!root.join("OldProj").exists());
    }

    #[test]
    fn test_conflict_on_disk_does_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::write(root.join("OldProj.sln"), "OldProj").unwrap();
        std::fs::write(root.join("NewProj.sln"), "keep me").unwrap();

        let cfg = RenameConfig { root: root.to_path_buf(), ..RenameConfig::new("OldProj", "NewProj") };
        let report = run(&cfg, &RealFileSystem).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(std::fs::read_to_string(root.join("NewProj.sln")).unwrap(), "keep me");
        assert_eq!(std::fs::read_to_string(root.join("OldProj.sln")).unwrap(), "NewProj");
    }

    proptest! {
        #[test]
        fn test_run_properties(
            keyword in "[A-Z][a-z]{3,6}",
            name in "[0-9]{2,4}",
            filler in "[a-z _()\"]{0,20}"
        ) {
            let sln = format!("/p/{keyword}.sln");
            let dir = format!("/p/{keyword}");
            let vcxproj = format!("/p/{keyword}/{keyword}.vcxproj");
            let source = format!("/p/{keyword}/src_{keyword}.cpp");
            let body = format!("{filler}{keyword}{filler}{keyword}");

            let fs = MockFileSystem::new()
                .with_dir("/p")
                .with_file(&sln, &body)
                .with_dir(&dir)
                .with_file(&vcxproj, &body)
                .with_file(&source, &body);

            let report = run(&config(&keyword, &name), &fs).unwrap();
            prop_assert!(report.is_success());

            let expected = body.replace(&keyword, &name);
            let new_sln = format!("/p/{name}.sln");
            let new_vcxproj = format!("/p/{name}/{name}.vcxproj");
            let new_source = format!("/p/{name}/src_{name}.cpp");
            prop_assert_eq!(fs.contents(&new_sln), Some(expected.clone()));
            prop_assert_eq!(fs.contents(&new_vcxproj), Some(expected));
            prop_assert_eq!(fs.contents(&new_source), Some(body));
            prop_assert!(fs.paths().iter().all(|p| !p.to_string_lossy().contains(&keyword)));
        }
    }
}
