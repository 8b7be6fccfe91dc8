use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::error;

lazy_static! {
    /// Stores the set of unique invariant keys (descriptions) that have been successfully asserted.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// Asserts that a rename invariant holds true.
///
/// If the condition is false, this will panic (in debug/test) or log a critical error (in prod).
/// If true, it records that this invariant was explicitly checked, allowing for "Contract Tests".
///
/// # Arguments
/// * `condition` - The boolean result of the check.
/// * `description` - A human-readable description of the invariant (e.g., "Rename must stay in its directory").
/// * `component` - Optional component tag (e.g., "Planner", "Renamer").
pub fn assert_invariant(condition: bool, description: &str, component: Option<&str>) {
    if !condition {
        let msg = format!(
            "CRITICAL INVARIANT VIOLATION [{}]: {}",
            component.unwrap_or("General"),
            description
        );
        error!("{}", msg);

        if cfg!(debug_assertions) || cfg!(test) {
            panic!("{}", msg);
        }
    } else if let Ok(mut set) = CHECKED_INVARIANTS.lock() {
        set.insert(description.to_string());
    }
}

/// A "Contract Test" verifies that specific invariants were actually checked during execution.
///
/// # Arguments
/// * `context` - Name of the test context.
/// * `required_invariants` - List of description strings that MUST have been asserted.
#[cfg(test)]
pub fn contract_test(context: &str, required_invariants: &[&str]) {
    let checked = CHECKED_INVARIANTS.lock().unwrap();
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|req| !checked.contains(*req))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Contract Test Failed for '{}'. The following invariants were NOT checked:\n{:#?}",
            context, missing
        );
    }
    log::info!("Contract Test Passed: {}", context);
}
