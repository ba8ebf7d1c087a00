//! Candidate-secret dictionary loading.
//!
//! Grounded on `loadcfg.go`'s `fToStrSlc`: read the whole file and split it
//! into one `String` per line. Blank lines are kept — blank entries are
//! permitted candidate secrets; filtering them is the caller's choice, not
//! this function's.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads `path` into an ordered list of candidate secrets, one per line.
pub fn load(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_one_entry_per_line_preserving_order() {
        let mut tmp = tempfile_with_content("hunter2\npassword\nqwerty\n");
        let secrets = load(tmp.path()).unwrap();
        assert_eq!(secrets, vec!["hunter2", "password", "qwerty"]);
        tmp.flush().unwrap();
    }

    #[test]
    fn keeps_blank_lines() {
        let tmp = tempfile_with_content("a\n\nb\n");
        let secrets = load(tmp.path()).unwrap();
        assert_eq!(secrets, vec!["a", "", "b"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load(Path::new("/nonexistent/path/to/wordlist.txt"));
        assert!(result.is_err());
    }

    fn tempfile_with_content(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new();
        tmp.file.write_all(content.as_bytes()).unwrap();
        tmp
    }

    /// A minimal self-deleting temp file, avoiding a `tempfile` crate
    /// dependency for this one test helper.
    struct NamedTempFile {
        file: std::fs::File,
        path: std::path::PathBuf,
    }

    impl NamedTempFile {
        fn new() -> Self {
            let mut path = std::env::temp_dir();
            let unique = format!(
                "sshcrack-wordlist-test-{:?}-{}",
                std::thread::current().id(),
                std::process::id()
            );
            path.push(unique);
            let file = std::fs::File::create(&path).unwrap();
            NamedTempFile { file, path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for NamedTempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
