// Render targets.
// Each render replaces the container's whole content.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::cache::store::write_text;
use crate::error::Result;

/// Container that receives the rendered feed.
pub trait RenderTarget {
    /// Replace the container's content with `html`.
    fn replace(&mut self, html: &str) -> Result<()>;

    /// Whether a later `replace` overwrites an earlier one. Append-only
    /// targets get a single render per refresh.
    fn replaces_content(&self) -> bool {
        true
    }
}

/// HTML fragment file, rewritten atomically on every render.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderTarget for FileTarget {
    fn replace(&mut self, html: &str) -> Result<()> {
        write_text(&self.path, html)
    }
}

/// Writes each render to stdout. Output cannot be taken back, so it only
/// receives the final render of a refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutTarget;

impl RenderTarget for StdoutTarget {
    fn replace(&mut self, html: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", html)?;
        stdout.flush()?;
        Ok(())
    }

    fn replaces_content(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_target_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("activity.html");
        let mut target = FileTarget::new(&path);

        target.replace("<li>one</li>\n<li>two</li>").unwrap();
        target.replace("<li>three</li>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<li>three</li>");

        target.replace("").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(target.replaces_content());
    }

    #[test]
    fn test_stdout_is_append_only() {
        assert!(!StdoutTarget.replaces_content());
    }
}
