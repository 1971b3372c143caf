//! Dead Code Enforcement
//!
//! Production sources of the workspace crates must not silence the dead code
//! lint. Test-only files and inline test modules are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// A dead code allowance found in production code
#[derive(Debug)]
struct DeadCodeViolation {
    file_path: String,
    line_number: usize,
    context: String,
}

/// Workspace root, one level above this crate.
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

/// `src` directories of every `marquee-*` crate except this one.
fn production_source_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name.starts_with("marquee-") && name != "marquee-tests" && path.join("src").is_dir() {
            dirs.push(path.join("src"));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rust_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Files that only compile under `cfg(test)` or the test-utils feature
fn is_test_file(path: &Path) -> bool {
    matches!(
        path.file_stem().and_then(|stem| stem.to_str()),
        Some("testing" | "mock")
    )
}

/// Scans lines up to the first inline test module.
fn check_source(file_path: &str, content: &str) -> Vec<DeadCodeViolation> {
    let mut violations = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed == "mod tests {" {
            break;
        }
        if trimmed.starts_with("#[allow(") && trimmed.contains("dead_code") {
            violations.push(DeadCodeViolation {
                file_path: file_path.to_string(),
                line_number: index + 1,
                context: trimmed.to_string(),
            });
        }
    }
    violations
}

#[test]
fn test_no_dead_code_allowances_in_production() {
    let root = workspace_root();
    let mut files = Vec::new();
    for dir in production_source_dirs(&root).unwrap() {
        collect_rust_files(&dir, &mut files).unwrap();
    }
    assert!(!files.is_empty(), "no sources found under {}", root.display());

    let violations: Vec<DeadCodeViolation> = files
        .iter()
        .filter(|path| !is_test_file(path))
        .flat_map(|path| {
            let content = fs::read_to_string(path).unwrap();
            check_source(&path.to_string_lossy(), &content)
        })
        .collect();

    for violation in &violations {
        println!(
            "{}:{}\n  {}",
            violation.file_path, violation.line_number, violation.context
        );
    }
    assert!(
        violations.is_empty(),
        "Found {} #[allow(dead_code)] attribute(s) in production code. \
         Remove the unused code or move it behind cfg(test).",
        violations.len()
    );
}

#[test]
fn test_check_source_stops_at_test_module() {
    let content = "\
fn live() {}
#[allow(dead_code)]
fn unused() {}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    fn helper() {}
}
";
    let violations = check_source("lib.rs", content);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line_number, 2);
}

#[test]
fn test_is_test_file() {
    assert!(is_test_file(Path::new("marquee-core/src/suggest/testing.rs")));
    assert!(is_test_file(Path::new("marquee-search/src/providers/mock.rs")));
    assert!(!is_test_file(Path::new("marquee-search/src/service.rs")));
}
