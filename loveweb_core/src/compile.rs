// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::BuildError;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// A single invocation of the love.js CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub runner: String,
    pub entry_point: PathBuf,
    pub archive: PathBuf,
    pub output_dir: PathBuf,
    pub title: String,
    /// love.js resolves some of its own files relative to the current directory,
    /// so it is run from inside the toolchain directory.
    pub working_dir: PathBuf,
}

impl CompileCommand {
    pub fn new(
        runner: &str,
        entry_point: &Path,
        archive: &Path,
        output_dir: &Path,
        title: &str,
        working_dir: &Path,
    ) -> Self {
        Self {
            runner: runner.to_owned(),
            entry_point: entry_point.to_path_buf(),
            archive: archive.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            title: title.to_owned(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Arguments passed to the runner: `<entry> <archive> <output> --title <title>`.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            self.entry_point.clone().into_os_string(),
            self.archive.clone().into_os_string(),
            self.output_dir.clone().into_os_string(),
            OsString::from("--title"),
            OsString::from(&self.title),
        ]
    }

    /// Runs the compiler to completion.
    ///
    /// The child inherits this process's environment and standard streams, so
    /// love.js progress output shows up as it happens.
    pub async fn run(&self) -> Result<(), BuildError> {
        log::info!("Running: {self}");

        let status = Command::new(&self.runner)
            .args(self.args())
            .current_dir(&self.working_dir)
            .status()
            .await
            .map_err(|source| BuildError::CompileSpawn {
                runner: self.runner.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CompileFailed { status })
        }
    }
}

impl fmt::Display for CompileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.runner)?;
        for arg in self.args() {
            let arg = arg.to_string_lossy();
            if arg.starts_with("--") {
                write!(f, " {arg}")?;
            } else {
                write!(f, " \"{arg}\"")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompileCommand {
        CompileCommand::new(
            "node",
            Path::new("/t/love.js/index.js"),
            Path::new("/p/dist/game.love"),
            Path::new("/p/web-build"),
            "My Game",
            Path::new("/t/love.js"),
        )
    }

    #[test]
    fn test_args_order() {
        let args = sample().args();
        assert_eq!(
            args,
            vec![
                OsString::from("/t/love.js/index.js"),
                OsString::from("/p/dist/game.love"),
                OsString::from("/p/web-build"),
                OsString::from("--title"),
                OsString::from("My Game"),
            ]
        );
    }

    #[test]
    fn test_display_quotes_paths() {
        assert_eq!(
            sample().to_string(),
            r#"node "/t/love.js/index.js" "/p/dist/game.love" "/p/web-build" --title "My Game""#
        );
    }

    #[tokio::test]
    async fn test_run_missing_runner_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = CompileCommand {
            runner: "loveweb-no-such-runner".to_owned(),
            working_dir: dir.path().to_path_buf(),
            ..sample()
        };
        let err = command.run().await.unwrap_err();
        assert!(matches!(err, BuildError::CompileSpawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_passes_arguments_from_toolchain_dir() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("compile");
        std::fs::write(
            &script,
            "pwd > \"$2/cwd.txt\"\nprintf '%s|' \"$@\" > \"$2/args.txt\"\n",
        )
        .unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let command = CompileCommand::new(
            "sh",
            &script,
            Path::new("game.love"),
            &out,
            "Title Here",
            dir.path(),
        );
        command.run().await.unwrap();

        let args = std::fs::read_to_string(out.join("args.txt")).unwrap();
        assert_eq!(args, format!("game.love|{}|--title|Title Here|", out.display()));
        let cwd = std::fs::read_to_string(out.join("cwd.txt")).unwrap();
        assert_eq!(
            std::fs::canonicalize(cwd.trim()).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("compile");
        std::fs::write(&script, "exit 3\n").unwrap();

        let command = CompileCommand::new(
            "sh",
            &script,
            Path::new("game.love"),
            dir.path(),
            "T",
            dir.path(),
        );
        let err = command.run().await.unwrap_err();
        let BuildError::CompileFailed { status } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(status.code(), Some(3));
    }
}
