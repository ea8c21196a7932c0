//! Application directory resolution.
//!
//! Default input, output and config locations are anchored at the
//! application directory:
//!
//! - `JOBSPLIT_HOME`, when set and non-empty
//! - otherwise the directory holding the executable
//! - unless that executable lives in a Cargo `target/<profile>/` build
//!   directory (a `cargo run` from source), in which case the current
//!   directory

use std::path::{Path, PathBuf};

/// Environment variable overriding the application directory.
pub const HOME_ENV: &str = "JOBSPLIT_HOME";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "JOBSPLIT_CONFIG_PATH";

/// Name of the configuration file looked up in the application directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default input directory name, relative to the application directory.
pub const INPUT_DIR_NAME: &str = "csvinput";

/// Default output directory name, relative to the application directory.
pub const OUTPUT_DIR_NAME: &str = "csvoutput";

/// Resolves the application directory for this process.
#[must_use]
pub fn resolve_app_dir() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }

    let cwd = std::env::current_dir().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Failed to resolve current directory; using '.'");
        PathBuf::from(".")
    });

    match std::env::current_exe() {
        Ok(exe) => app_dir_for_executable(&exe, &cwd),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to resolve executable path; using current directory");
            cwd
        },
    }
}

/// File Cargo writes at the root of every build directory.
const CARGO_TARGET_MARKER: &str = "CACHEDIR.TAG";

/// Picks the application directory given an executable path.
///
/// Returns `cwd` when the executable sits in `target/<profile>/` (or its
/// `deps/` and `examples/` subdirectories) and that `target/` holds Cargo's
/// build marker.
#[must_use]
pub fn app_dir_for_executable(exe: &Path, cwd: &Path) -> PathBuf {
    let Some(exe_dir) = exe.parent() else {
        return cwd.to_path_buf();
    };

    if cargo_target_dir(exe_dir).is_some() {
        cwd.to_path_buf()
    } else {
        exe_dir.to_path_buf()
    }
}

/// Returns the Cargo `target/` directory that `exe_dir` is a profile output
/// directory of, if any.
fn cargo_target_dir(exe_dir: &Path) -> Option<&Path> {
    let profile_dir = if exe_dir
        .file_name()
        .is_some_and(|name| name == "deps" || name == "examples")
    {
        exe_dir.parent()?
    } else {
        exe_dir
    };

    let target = profile_dir.parent()?;
    let named_target = target.file_name().is_some_and(|name| name == "target");
    (named_target && target.join(CARGO_TARGET_MARKER).is_file()).then_some(target)
}

/// Resolves `path` against `base` unless it is already absolute.
#[must_use]
pub fn anchor(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Platform-specific config file (`<config_dir>/jobsplit/config.toml`).
#[must_use]
pub fn platform_config_file() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| {
        dirs.config_dir()
            .join(env!("CARGO_PKG_NAME"))
            .join(CONFIG_FILE_NAME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lays out `<root>/target/` with Cargo's marker and returns it.
    fn cargo_target(root: &Path) -> PathBuf {
        let target = root.join("target");
        std::fs::create_dir_all(target.join("debug").join("deps")).unwrap();
        std::fs::write(
            target.join(CARGO_TARGET_MARKER),
            "Signature: 8a477f597d28d172789f06886806bc55\n",
        )
        .unwrap();
        target
    }

    #[test]
    fn test_packaged_executable_uses_its_directory() {
        let dir = app_dir_for_executable(Path::new("/opt/jobsplit/jobsplit"), Path::new("/home/u"));
        assert_eq!(dir, PathBuf::from("/opt/jobsplit"));
    }

    #[test]
    fn test_cargo_target_uses_cwd() {
        let root = tempfile::tempdir().unwrap();
        let target = cargo_target(root.path());
        let cwd = Path::new("/home/u/project");

        let dir = app_dir_for_executable(&target.join("debug").join("jobsplit"), cwd);
        assert_eq!(dir, cwd);

        let test_binary = target.join("debug").join("deps").join("jobsplit-abc");
        let dir = app_dir_for_executable(&test_binary, cwd);
        assert_eq!(dir, cwd);
    }

    #[test]
    fn test_directory_named_target_is_not_a_build_dir() {
        let root = tempfile::tempdir().unwrap();
        let exe_dir = root.path().join("target").join("app");
        std::fs::create_dir_all(&exe_dir).unwrap();
        let cwd = Path::new("/home/u");

        let dir = app_dir_for_executable(&exe_dir.join("jobsplit"), cwd);
        assert_eq!(dir, exe_dir);

        let dir = app_dir_for_executable(Path::new("/srv/target/app/jobsplit"), cwd);
        assert_eq!(dir, PathBuf::from("/srv/target/app"));
    }

    #[test]
    fn test_deeper_target_ancestor_is_ignored() {
        let root = tempfile::tempdir().unwrap();
        let target = cargo_target(root.path());
        let exe_dir = target.join("debug").join("bundle").join("app");
        std::fs::create_dir_all(&exe_dir).unwrap();

        let dir = app_dir_for_executable(&exe_dir.join("jobsplit"), Path::new("/home/u"));
        assert_eq!(dir, exe_dir);
    }

    #[test]
    fn test_anchor() {
        let base = Path::new("/app");
        assert_eq!(anchor(base, "csvinput"), PathBuf::from("/app/csvinput"));
        assert_eq!(anchor(base, "/data/in"), PathBuf::from("/data/in"));
    }
}
