use std::path::{Path, PathBuf};

use crate::domain::value_objects::PackageManager;

/// Maximum number of stderr bytes carried by install failure events.
pub const STDERR_TAIL_BYTES: usize = 1024;

/// Result of the dependency install phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package manager exited successfully.
    Installed,
    /// The request asked to skip installation; nothing was spawned.
    Skipped,
    /// The install failed. The project on disk is still valid.
    Failed(InstallFailure),
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub fn failure(&self) -> Option<&InstallFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }
}

/// Details of a failed install, enough to tell the user how to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallFailure {
    pub root_path: PathBuf,
    pub package_manager: PackageManager,
    /// Exit code, `None` when the process never started or was killed.
    pub exit_code: Option<i32>,
    /// Everything the process wrote to stderr (or the spawn error).
    pub stderr: String,
    /// Human-readable cause.
    pub reason: String,
}

impl InstallFailure {
    /// The trailing [`STDERR_TAIL_BYTES`] of stderr.
    pub fn stderr_tail(&self) -> &str {
        tail_bytes(&self.stderr, STDERR_TAIL_BYTES)
    }

    /// Command the user can run to finish the install by hand.
    pub fn retry_command(&self) -> String {
        retry_command(&self.root_path, self.package_manager)
    }

    /// Lines telling the user the project exists and how to finish it.
    pub fn guidance(&self) -> Vec<String> {
        vec![
            "Oh, it seems that you encountered errors while installing dependencies in your project."
                .into(),
            "Don't give up, your project was created correctly.".into(),
            "Fix the issues mentioned in the installation errors and try to run the following command:"
                .into(),
            String::new(),
            self.retry_command(),
        ]
    }
}

pub fn retry_command(root: &Path, package_manager: PackageManager) -> String {
    format!("cd {} && {} install", root.display(), package_manager)
}

/// Last `max` bytes of `s`, moved forward to the next char boundary so the
/// result is always valid UTF-8.
pub fn tail_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(stderr: &str) -> InstallFailure {
        InstallFailure {
            root_path: PathBuf::from("/tmp/blog"),
            package_manager: PackageManager::Yarn,
            exit_code: Some(1),
            stderr: stderr.into(),
            reason: "exit status 1".into(),
        }
    }

    #[test]
    fn short_stderr_is_kept_whole() {
        assert_eq!(failure("network timeout").stderr_tail(), "network timeout");
    }

    #[test]
    fn long_stderr_keeps_trailing_bytes() {
        let stderr = format!("{}END", "x".repeat(5000));
        let f = failure(&stderr);

        assert_eq!(f.stderr_tail().len(), STDERR_TAIL_BYTES);
        assert!(f.stderr_tail().ends_with("END"));
    }

    #[test]
    fn tail_respects_char_boundaries() {
        // 'é' is two bytes; a 3-byte cut lands mid-character.
        let s = "aéé";
        assert_eq!(tail_bytes(s, 3), "é");
    }

    #[test]
    fn retry_command_names_package_manager() {
        assert_eq!(failure("").retry_command(), "cd /tmp/blog && yarn install");
    }

    #[test]
    fn skipped_counts_as_success() {
        assert!(InstallOutcome::Skipped.is_success());
        assert!(InstallOutcome::Installed.is_success());
        assert!(!InstallOutcome::Failed(failure("x")).is_success());
    }
}
