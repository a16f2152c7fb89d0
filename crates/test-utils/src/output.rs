//! Temporary output directories for render tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates a fresh temporary directory, removed when the guard drops.
pub fn temp_output_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("layer-tiler-test-")
        .tempdir()
        .expect("failed to create temporary output directory")
}

/// Lists every file below `root` as a path relative to it, sorted.
///
/// Uses `/` separators so assertions read the same on every platform.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort();
    files
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_nested() {
        let dir = temp_output_dir();
        fs::create_dir_all(dir.path().join("tiles/0")).unwrap();
        fs::write(dir.path().join("tiles/0/0-0.png"), b"x").unwrap();
        fs::write(dir.path().join("index.html"), b"y").unwrap();

        assert_eq!(list_files(dir.path()), vec!["index.html", "tiles/0/0-0.png"]);
    }
}
