// Cache path utilities.
// Maps storage keys to files under the user cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/activity-feed on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "activity-feed").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the file holding the value for `key`.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("tpieevents"), "tpieevents");
        assert_eq!(sanitize_name("owner/repo"), "owner_repo");
        assert_eq!(sanitize_name("a:b"), "a_b");
    }

    #[test]
    fn test_entry_path() {
        let path = entry_path(Path::new("/tmp/feed"), "tpieevents");
        assert!(path.ends_with("feed/tpieevents.json"));
    }
}
