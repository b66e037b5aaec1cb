//! Hygiene: scans production source for patterns that crash the page or hide
//! failures.
//!
//! A failed video callback or a bad upload must never take down the canvas,
//! so every budget is zero. Test files (`*_test.rs`) are exempt. A budget may
//! only be raised after an existing hit elsewhere has been removed.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    reason: &'static str,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, reason: "aborts the wasm instance" },
    Budget { pattern: ".expect(", max: 0, reason: "aborts the wasm instance" },
    Budget { pattern: "panic!(", max: 0, reason: "aborts the wasm instance" },
    Budget { pattern: "unreachable!(", max: 0, reason: "aborts the wasm instance" },
    Budget { pattern: "todo!(", max: 0, reason: "unfinished code path" },
    Budget { pattern: "unimplemented!(", max: 0, reason: "unfinished code path" },
];

const SILENT: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, reason: "drops a result without logging it" },
    Budget { pattern: ".ok()", max: 0, reason: "drops an error without logging it" },
];

const STYLE: &[Budget] = &[Budget { pattern: "#[allow(dead_code)]", max: 0, reason: "hides unused code" }];

fn production_sources(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_sources(&path, out);
            continue;
        }
        let is_rust = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rust && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

fn check(budgets: &[Budget]) {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let mut failures = Vec::new();
    for budget in budgets {
        let hits: Vec<String> = files
            .iter()
            .flat_map(|(path, content)| {
                content
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.contains(budget.pattern))
                    .map(move |(n, _)| format!("    {}:{}", path.display(), n + 1))
            })
            .collect();
        if hits.len() > budget.max {
            failures.push(format!(
                "`{}` ({}): found {}, max {}\n{}",
                budget.pattern,
                budget.reason,
                hits.len(),
                budget.max,
                hits.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budget exceeded:\n{}", failures.join("\n"));
}

#[test]
fn no_panicking_calls() {
    check(PANICS);
}

#[test]
fn no_silently_discarded_errors() {
    check(SILENT);
}

#[test]
fn no_dead_code_allowances() {
    check(STYLE);
}
