//! Layout checks: every source file has a unit test file at the mirrored path,
//! every test file holds at least one test, and the unit harness declares all
//! of its files.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Files that only wire modules together
    fn is_wiring_file(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    fn relative_paths(root: &str) -> BTreeSet<String> {
        let root_path = Path::new(root);
        let mut paths = BTreeSet::new();
        let scanned = walk(root_path, root_path, &mut paths);
        assert!(
            scanned.is_ok() || !root_path.exists(),
            "Failed to scan {root}: {scanned:?}"
        );
        paths
    }

    fn walk(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|e| io::Error::other(e.to_string()))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.insert(relative);
                walk(&path, base, paths)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    // Tests that every source file has a unit test counterpart
    // Verified by comparing the mirrored relative paths
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let test_paths = relative_paths(UNIT_DIR);
        let missing: Vec<String> = relative_paths(SRC_DIR)
            .into_iter()
            .filter(|path| !is_wiring_file(path) && !test_paths.contains(path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Tests that no unit test file outlives its source file
    // Verified by looking up each test path under src
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_paths = relative_paths(SRC_DIR);
        let orphaned: Vec<String> = relative_paths(UNIT_DIR)
            .into_iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(path))
            .map(|path| format!("  - tests/unit/{path}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    // Tests that the unit harness compiles every file under tests/unit
    // Verified by finding a `mod` declaration for each sibling in the parent mod.rs
    #[test]
    fn test_unit_modules_are_declared() {
        let mut undeclared = Vec::new();

        for path in relative_paths(UNIT_DIR) {
            if path.ends_with("mod.rs") {
                continue;
            }
            let (parent, leaf) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
            let name = leaf.trim_end_matches(".rs");
            let mod_file = if parent.is_empty() {
                format!("{UNIT_DIR}/mod.rs")
            } else {
                format!("{UNIT_DIR}/{parent}/mod.rs")
            };

            let declared = fs::read_to_string(&mod_file).is_ok_and(|content| {
                content
                    .lines()
                    .map(str::trim)
                    .any(|line| line == format!("mod {name};") || line == format!("pub mod {name};"))
            });
            if !declared {
                undeclared.push(format!("  - {path} (expected in {mod_file})"));
            }
        }

        assert!(
            undeclared.is_empty(),
            "Unit test files not declared by their mod.rs:\n{}",
            undeclared.join("\n")
        );
    }

    // Tests that every test file contains a test function
    // Verified by searching each non-wiring file for the test attribute
    #[test]
    fn test_all_test_files_contain_tests() {
        let empty: Vec<String> = relative_paths("tests")
            .into_iter()
            .filter(|path| path.ends_with(".rs") && !path.ends_with("mod.rs"))
            .filter(|path| {
                fs::read_to_string(Path::new("tests").join(path))
                    .is_ok_and(|content| !content.contains("#[test]"))
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
