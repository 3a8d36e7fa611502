//! Gathering the names to consider from arguments and stdin.

use crate::error::{CliError, Result};
use std::io::BufRead;

/// The name that stands for "read names from stdin"
pub const STDIN_MARKER: &str = "-";

/// Collect names: stdin lines first (when `-` is given), then the arguments
///
/// With `expand_globs`, each argument is treated as a wild-card pattern and
/// replaced by its matches; a pattern matching nothing contributes nothing.
pub fn gather_names<R: BufRead>(args: &[String], expand_globs: bool, stdin: R) -> Result<Vec<String>> {
    let mut names = Vec::new();

    if args.iter().any(|arg| arg == STDIN_MARKER) {
        for line in stdin.lines() {
            let line = line?;
            if !line.is_empty() {
                names.push(line);
            }
        }
    }

    for arg in args.iter().filter(|arg| *arg != STDIN_MARKER) {
        if expand_globs {
            names.extend(expand(arg)?);
        } else {
            names.push(arg.clone());
        }
    }

    Ok(names)
}

fn expand(pattern: &str) -> Result<Vec<String>> {
    let paths = glob::glob(pattern)
        .map_err(|e| CliError::InvalidInput(format!("bad pattern '{}': {}", pattern, e)))?;

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path.to_string_lossy().into_owned()),
            Err(e) => tracing::warn!("Skipping unreadable match of '{}': {}", pattern, e),
        }
    }
    if matches.is_empty() {
        tracing::debug!("Pattern '{}' matched nothing", pattern);
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn args(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_plain_arguments() {
        let names = gather_names(&args(&["a", "b*"]), false, Cursor::new("")).unwrap();
        assert_eq!(names, vec!["a", "b*"]);
    }

    #[test]
    fn test_stdin_names_come_first() {
        let stdin = Cursor::new("from-stdin-1\n\nfrom-stdin-2\n");
        let names = gather_names(&args(&["arg", "-"]), false, stdin).unwrap();
        assert_eq!(names, vec!["from-stdin-1", "from-stdin-2", "arg"]);
    }

    #[test]
    fn test_stdin_ignored_without_marker() {
        let names = gather_names(&args(&["arg"]), false, Cursor::new("unused\n")).unwrap();
        assert_eq!(names, vec!["arg"]);
    }

    #[test]
    fn test_glob_expansion() {
        let dir = TempDir::new().unwrap();
        for name in ["backup-1", "backup-2", "other"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/backup-*", dir.path().display());
        let missing = format!("{}/nothing-*", dir.path().display());

        let names = gather_names(&[pattern, missing], true, Cursor::new("")).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("backup-1"));
        assert!(names[1].ends_with("backup-2"));
    }

    #[test]
    fn test_bad_glob_pattern() {
        let result = gather_names(&args(&["[unclosed"]), true, Cursor::new(""));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
