//! Storage path resolution.

use std::path::{Path, PathBuf};

use crate::error::{JournalError, Result};

/// Expand a leading `~` to the invoking user's home directory.
///
/// `~` and `~/rest` are expanded; every other path (including `~user`) is
/// returned unchanged.
///
/// # Errors
///
/// Returns `JournalError::InvalidInput` when the path needs expansion but no
/// home directory can be determined.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return Ok(PathBuf::from(path)),
    };

    let home = dirs::home_dir().ok_or_else(|| {
        JournalError::InvalidInput(
            "Can't determine the current user's home directory".to_string(),
        )
    })?;

    let relative = rest.trim_start_matches(['/', '\\']);
    if relative.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(Path::new(relative)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilde_slash_expands_under_home() {
        let home = dirs::home_dir().unwrap();

        let expanded = expand_home("~/journal/entries").unwrap();

        assert!(expanded.is_absolute());
        assert_eq!(expanded, home.join("journal").join("entries"));
    }

    #[test]
    fn test_bare_tilde_is_home() {
        assert_eq!(expand_home("~").unwrap(), dirs::home_dir().unwrap());
    }

    #[test]
    fn test_other_paths_unchanged() {
        assert_eq!(
            expand_home("/var/lib/journal").unwrap(),
            PathBuf::from("/var/lib/journal")
        );
        assert_eq!(
            expand_home("relative/~/dir").unwrap(),
            PathBuf::from("relative/~/dir")
        );
        assert_eq!(expand_home("~other").unwrap(), PathBuf::from("~other"));
    }
}
