use std::path::{Path, PathBuf};

const MAX_LINES: usize = 750;

const CHECKED_EXTENSIONS: &[&str] = &["rs", "md", "yaml", "toml"];

const EXCLUDED_DIRS: &[&str] = &["target", ".git", "examples", "original_source"];

const EXCLUDED_FILES: &[&str] = &["Cargo.lock", "spec.md", "SPEC_FULL.md"];

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let root = PathBuf::from(&manifest_dir);

    let mut files = Vec::new();
    walk_directory(&root, &root, &mut files);
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    enforce_line_limits(&root, &files);

    let rust_files: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| {
            p.extension().and_then(|e| e.to_str()) == Some("rs")
                && p.file_name().and_then(|n| n.to_str()) != Some("build.rs")
        })
        .collect();
    enforce_no_dead_code_allows(&root, &rust_files);
    enforce_serial_for_env_mutations(&root, &rust_files);
}

fn walk_directory(dir: &Path, root: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if EXCLUDED_DIRS.contains(&name) {
                    continue;
                }
            }
            walk_directory(&path, root, files);
        } else if should_check_file(&path, root) {
            files.push(path);
        }
    }
}

fn should_check_file(path: &Path, root: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    if !CHECKED_EXTENSIONS.contains(&ext) {
        return false;
    }

    match path.strip_prefix(root) {
        Ok(rel_path) => {
            let rel_str = rel_path.to_string_lossy();
            !EXCLUDED_FILES.iter().any(|excluded| rel_str == *excluded)
        }
        Err(_) => true,
    }
}

fn relative(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root).unwrap_or(file).to_path_buf()
}

fn enforce_line_limits(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();
    for file in files {
        match std::fs::read_to_string(file) {
            Ok(content) => {
                let line_count = content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .count();
                if line_count > MAX_LINES {
                    violations.push((relative(root, file), line_count));
                }
            }
            Err(e) => {
                println!(
                    "cargo:warning=Could not read file {}: {}",
                    relative(root, file).display(),
                    e
                );
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("FILE LINE LIMIT EXCEEDED (max {} lines)", MAX_LINES);
        eprintln!("========================================");
        for (path, lines) in &violations {
            eprintln!(
                "  {} - {} lines (exceeds by {})",
                path.display(),
                lines,
                lines - MAX_LINES
            );
        }
        eprintln!("========================================\n");
        panic!(
            "Build failed: {} file(s) exceed the {} line limit",
            violations.len(),
            MAX_LINES
        );
    }
}

fn enforce_no_dead_code_allows(root: &Path, rust_files: &[PathBuf]) {
    let mut violations: Vec<(PathBuf, usize, String)> = Vec::new();

    for file in rust_files {
        if let Ok(content) = std::fs::read_to_string(file) {
            for (line_num, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
                    && trimmed.contains("dead_code")
                {
                    violations.push((relative(root, file), line_num + 1, trimmed.to_string()));
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("#[allow(dead_code)] IS NOT ALLOWED");
        eprintln!("========================================");
        for (path, line_num, line) in &violations {
            eprintln!("  {}:{}", path.display(), line_num);
            eprintln!("    {}", line);
        }
        eprintln!("========================================\n");
        eprintln!("Delete unused code, or gate test helpers behind #[cfg(test)].");
        panic!(
            "Build failed: {} #[allow(dead_code)] occurrence(s) found. Remove the dead code.",
            violations.len()
        );
    }
}

/// Requires #[serial] for tests that mutate environment variables.
///
/// The config loader reads `LPA_PROGRESS_CONFIG`; tests that set it without
/// #[serial] race with each other.
fn enforce_serial_for_env_mutations(root: &Path, rust_files: &[PathBuf]) {
    let mut violations: Vec<(PathBuf, usize, String)> = Vec::new();

    for file in rust_files {
        let content = match std::fs::read_to_string(file) {
            Ok(c) => c,
            Err(_) => continue,
        };

        let mut has_serial = false;
        let mut test_fn_start = 0;
        let mut in_test_fn = false;
        let mut brace_depth: i32 = 0;

        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
                has_serial = true;
            }
            if trimmed == "#[test]" || trimmed.starts_with("#[tokio::test") {
                test_fn_start = i + 1;
                in_test_fn = true;
                brace_depth = 0;
            }

            if !in_test_fn {
                continue;
            }

            for c in line.chars() {
                if c == '{' {
                    brace_depth += 1;
                } else if c == '}' {
                    brace_depth -= 1;
                }
            }

            let mutates_env = !trimmed.starts_with("//")
                && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"));
            if mutates_env && !has_serial {
                violations.push((
                    relative(root, file),
                    test_fn_start,
                    "test mutates env without #[serial]".to_string(),
                ));
                in_test_fn = false;
                has_serial = false;
            } else if brace_depth == 0 && trimmed.ends_with('}') {
                in_test_fn = false;
                has_serial = false;
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("ENV MUTATIONS REQUIRE #[serial]");
        eprintln!("========================================");
        for (path, line_num, msg) in &violations {
            eprintln!("  {}:{}", path.display(), line_num);
            eprintln!("    {}", msg);
        }
        eprintln!("========================================\n");
        panic!(
            "Build failed: {} test(s) mutate environment variables without #[serial]",
            violations.len()
        );
    }
}
