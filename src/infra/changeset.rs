//! Change set acquisition from git.

use std::path::Path;
use tokio::process::Command;

/// List the files touched by the commit under review.
///
/// Runs `git diff --name-only HEAD~1 HEAD` in `repo_dir`, which is the
/// checkout the CI runner prepared. Any failure (git missing, not a
/// repository, a root commit with no parent) degrades to an empty change
/// set with a warning so the run ends quietly instead of crashing CI.
pub async fn changed_files_in(repo_dir: &Path) -> Vec<String> {
    let output = match Command::new("git")
        .args(["diff", "--name-only", "HEAD~1", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .await
    {
        Ok(output) => output,
        Err(err) => {
            log::warn!("could not run git diff: {err}; treating change set as empty");
            return Vec::new();
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!(
            "git diff exited with {}: {}; treating change set as empty",
            output.status,
            stderr.trim()
        );
        return Vec::new();
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .status()
            .expect("run git");
        assert!(status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn lists_files_changed_by_the_last_commit() {
        let dir = tempfile::tempdir().expect("tempdir");
        git(dir.path(), &["init", "--quiet", "--initial-branch=main"]);

        std::fs::write(dir.path().join("first.py"), "x = 1\n").expect("write");
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "--quiet", "-m", "first"]);

        std::fs::write(dir.path().join("second.js"), "let y = 2;\n").expect("write");
        std::fs::write(dir.path().join("first.py"), "x = 2\n").expect("write");
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "--quiet", "-m", "second"]);

        let files = changed_files_in(dir.path()).await;
        assert_eq!(files, vec!["first.py".to_string(), "second.js".to_string()]);
    }

    #[tokio::test]
    async fn degrades_to_empty_outside_a_repository() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(changed_files_in(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn degrades_to_empty_on_a_root_commit() {
        let dir = tempfile::tempdir().expect("tempdir");
        git(dir.path(), &["init", "--quiet", "--initial-branch=main"]);
        std::fs::write(dir.path().join("only.py"), "x = 1\n").expect("write");
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "--quiet", "-m", "only"]);

        // HEAD~1 does not exist yet.
        assert!(changed_files_in(dir.path()).await.is_empty());
    }
}
