//! Hygiene: scans the editor crate's production sources for antipatterns.
//!
//! Each pattern has a budget, ideally zero. The budget never grows: adding an
//! occurrence means removing one somewhere else first.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    reason: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, reason: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, reason: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, reason: "aborts the host frame" },
    Budget { pattern: "unreachable!(", max: 0, reason: "aborts the host frame" },
    Budget { pattern: "todo!(", max: 0, reason: "unfinished stub" },
    Budget { pattern: "unimplemented!(", max: 0, reason: "unfinished stub" },
    Budget { pattern: "let _ =", max: 0, reason: "discards a result unseen" },
    Budget { pattern: ".ok()", max: 0, reason: "discards an error unseen" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, reason: "hides unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, test siblings excluded.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")), "run from the editor crate root");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "{} budget exceeded ({}): found {count}, max {}\n{}",
                budget.pattern,
                budget.reason,
                budget.max,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "\n{}", failures.join("\n"));
}
