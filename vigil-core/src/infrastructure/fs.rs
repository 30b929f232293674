// vigil-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Replaces `path` with `content` in one step: readers see the old file or
/// the new one, never a half-written report.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Same directory as the target so the final rename never crosses devices.
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_ref())?;
    staged.flush()?;
    staged.persist(path).map_err(|e| InfrastructureError::Io(e.error))?;

    debug!(path = ?path, bytes = content.as_ref().len(), "Artifact written");
    Ok(())
}

/// Creates the artifact directory tree, then writes atomically.
pub fn write_artifact<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    atomic_write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_replaces_previous_content() -> Result<()> {
        let dir = tempdir()?;
        let report = dir.path().join("analysis_report.json");

        atomic_write(&report, "{}")?;
        atomic_write(&report, r#"{"approved":true}"#)?;

        assert_eq!(fs::read_to_string(&report)?, r#"{"approved":true}"#);
        // No staging files left behind.
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_artifact_creates_missing_directories() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("target").join("reports").join("analysis_report.md");

        write_artifact(&nested, "# Report")?;

        assert_eq!(fs::read_to_string(nested)?, "# Report");
        Ok(())
    }
}
