// src/version.rs
//! Version persistence and manifest stamping.
//!
//! The version of record lives in a hidden single-line file next to the
//! package. [`VersionManager`] keeps that file (and optionally a project
//! manifest) in sync, preferring the most recent version-control tag when
//! one is reachable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use crate::error::{AppSupportError, Result};

/// Version reported when no static version file exists yet.
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Hidden file holding the persisted version string.
pub const STATIC_VERSION_FILE: &str = ".static-version";

/// Manifest file patched by the zero-argument CLI run.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Manifest section whose first version line gets rewritten.
const PROJECT_SECTION: &str = "[project]";

static PACKAGE_VERSION: LazyLock<String> = LazyLock::new(|| {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(STATIC_VERSION_FILE);
    fs::read_to_string(path)
        .map(|contents| contents.trim().to_string())
        .unwrap_or_else(|_| DEFAULT_VERSION.to_string())
});

/// Version of this package as persisted next to its manifest, read once
/// per process and cached. Falls back to [`DEFAULT_VERSION`] when the
/// static version file is absent.
pub fn package_version() -> &'static str {
    PACKAGE_VERSION.as_str()
}

/// Reads and writes the persisted version string, preferring the latest
/// version-control tag when one is reachable.
///
/// Holds nothing but its configured paths; every operation goes straight
/// to the filesystem, so separate instances over the same files behave
/// identically.
#[derive(Debug, Clone)]
pub struct VersionManager {
    version_file: PathBuf,
    manifest_file: Option<PathBuf>,
    repo_dir: Option<PathBuf>,
}

impl VersionManager {
    pub fn new(version_file: impl Into<PathBuf>) -> Self {
        Self {
            version_file: version_file.into(),
            manifest_file: None,
            repo_dir: None,
        }
    }

    /// Also rewrite the `[project]` version line of `manifest` on updates.
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest_file = Some(manifest.into());
        self
    }

    /// Run the tag lookup in `dir` instead of the process working directory.
    #[must_use]
    pub fn with_repo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    /// Trimmed contents of the version file, or [`DEFAULT_VERSION`] when
    /// the file does not exist yet. Any other I/O failure is surfaced.
    pub fn persisted_version(&self) -> Result<String> {
        match fs::read_to_string(&self.version_file) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(DEFAULT_VERSION.to_string()),
            Err(err) => Err(AppSupportError::VersionRead {
                path: self.version_file.clone(),
                source: err,
            }),
        }
    }

    /// Persist `version` to the version file and patch the manifest if one
    /// is configured.
    pub fn set_version(&self, version: &str) -> Result<()> {
        self.write_version_file(version)?;
        self.patch_manifest(version)
    }

    /// Resolve the current version (tag > persisted file > default) and
    /// persist it. Intended as a build-time step; returns what was written.
    pub fn update_to_latest(&self) -> Result<String> {
        let version = match self.latest_tag() {
            Some(tag) => tag,
            None => self.persisted_version()?,
        };
        self.set_version(&version)?;
        Ok(version)
    }

    /// Most recent tag reachable from the checkout, if any.
    ///
    /// A missing `git` binary, a non-zero exit, and an empty tag list all
    /// look the same from here: no tag.
    fn latest_tag(&self) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(["describe", "--tags"]);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        let output = match cmd.output() {
            Ok(output) => output,
            Err(err) => {
                log::debug!("tag lookup unavailable: {err}");
                return None;
            }
        };
        if !output.status.success() {
            log::debug!("git describe found no tags");
            return None;
        }
        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!tag.is_empty()).then_some(tag)
    }

    fn write_version_file(&self, version: &str) -> Result<()> {
        fs::write(&self.version_file, format!("{version}\n")).map_err(|err| {
            AppSupportError::VersionWrite {
                path: self.version_file.clone(),
                source: err,
            }
        })
    }

    /// Rewrite the first `version` line inside the `[project]` section.
    ///
    /// No-op when no manifest is configured, the file is missing, or it is
    /// empty. Every other line passes through byte-for-byte, and a
    /// non-empty manifest is written back even when no line matched.
    fn patch_manifest(&self, version: &str) -> Result<()> {
        let Some(path) = &self.manifest_file else {
            return Ok(());
        };
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("manifest '{}' not found, skipping patch", path.display());
                return Ok(());
            }
            Err(err) => {
                return Err(AppSupportError::ManifestRead {
                    path: path.clone(),
                    source: err,
                });
            }
        };
        if contents.is_empty() {
            return Ok(());
        }

        let mut patched = String::with_capacity(contents.len());
        let mut in_project_section = false;
        let mut replaced = false;
        for line in contents.split_inclusive('\n') {
            let trimmed = line.trim();
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_project_section = trimmed == PROJECT_SECTION;
            } else if in_project_section && !replaced && line.contains("version") {
                patched.push_str(&format!("version = \"{version}\"\n"));
                replaced = true;
                continue;
            }
            patched.push_str(line);
        }

        fs::write(path, patched).map_err(|err| AppSupportError::ManifestWrite {
            path: path.clone(),
            source: err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> VersionManager {
        VersionManager::new(dir.join(STATIC_VERSION_FILE)).with_repo_dir(dir.to_path_buf())
    }

    #[test]
    fn missing_version_file_yields_the_default() {
        let dir = tempdir().unwrap();
        assert_eq!(
            manager_in(dir.path()).persisted_version().unwrap(),
            DEFAULT_VERSION
        );
    }

    #[test]
    fn persisted_version_is_trimmed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STATIC_VERSION_FILE), "1.2.3\n  ").unwrap();
        assert_eq!(manager_in(dir.path()).persisted_version().unwrap(), "1.2.3");
    }

    #[test]
    fn set_version_round_trips_through_the_file() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());
        manager.set_version("2.0.0").unwrap();
        assert_eq!(manager.persisted_version().unwrap(), "2.0.0");
        assert_eq!(
            fs::read_to_string(dir.path().join(STATIC_VERSION_FILE)).unwrap(),
            "2.0.0\n"
        );
    }

    #[test]
    fn patches_only_the_project_section() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        fs::write(
            &manifest,
            "[build-system]\n\
             requires = [\"setuptools\"]\n\
             \n\
             [tool.other]\n\
             version = \"9.9.9\"\n\
             \n\
             [project]\n\
             name = \"demo\"\n\
             version = \"0.0.1\"\n\
             description = \"demo application\"\n",
        )
        .unwrap();

        let manager = manager_in(dir.path()).with_manifest(&manifest);
        manager.set_version("3.1.4").unwrap();

        let patched = fs::read_to_string(&manifest).unwrap();
        assert!(patched.contains("[tool.other]\nversion = \"9.9.9\""));
        assert!(patched.contains("version = \"3.1.4\"\n"));
        assert!(patched.contains("name = \"demo\""));
        assert!(patched.contains("description = \"demo application\""));
        assert!(!patched.contains("version = \"0.0.1\""));
    }

    #[test]
    fn only_the_first_version_line_is_rewritten() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        fs::write(
            &manifest,
            "[project]\nversion = \"0.0.1\"\ntool-version = \"0.0.1\"\n",
        )
        .unwrap();

        let manager = manager_in(dir.path()).with_manifest(&manifest);
        manager.set_version("5.0.0").unwrap();

        assert_eq!(
            fs::read_to_string(&manifest).unwrap(),
            "[project]\nversion = \"5.0.0\"\ntool-version = \"0.0.1\"\n"
        );
    }

    #[test]
    fn missing_manifest_is_skipped_and_not_created() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        let manager = manager_in(dir.path()).with_manifest(&manifest);
        manager.set_version("1.0.0").unwrap();
        assert!(!manifest.exists());
    }

    #[test]
    fn empty_manifest_is_left_untouched() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE);
        fs::write(&manifest, "").unwrap();

        let manager = manager_in(dir.path()).with_manifest(&manifest);
        manager.set_version("1.0.0").unwrap();
        assert_eq!(fs::read_to_string(&manifest).unwrap(), "");
    }

    #[test]
    fn update_falls_back_to_the_persisted_version() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STATIC_VERSION_FILE), "9.9.9\n").unwrap();

        let manager = manager_in(dir.path());
        assert_eq!(manager.update_to_latest().unwrap(), "9.9.9");
        assert_eq!(
            fs::read_to_string(dir.path().join(STATIC_VERSION_FILE)).unwrap(),
            "9.9.9\n"
        );
    }

    #[test]
    fn update_from_scratch_writes_the_default() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());
        assert_eq!(manager.update_to_latest().unwrap(), DEFAULT_VERSION);
        assert_eq!(
            fs::read_to_string(dir.path().join(STATIC_VERSION_FILE)).unwrap(),
            "0.0.1\n"
        );
    }

    #[test]
    fn update_prefers_a_reachable_tag() {
        if Command::new("git").arg("--version").output().is_err() {
            return; // no git on this machine
        }
        let dir = tempdir().unwrap();
        let git = |args: &[&str]| {
            let output = Command::new("git")
                .args(args)
                .current_dir(dir.path())
                .output()
                .unwrap();
            assert!(output.status.success(), "git {args:?} failed");
        };
        git(&["init", "-q"]);
        git(&[
            "-c",
            "user.email=ci@example.com",
            "-c",
            "user.name=ci",
            "commit",
            "--allow-empty",
            "-q",
            "-m",
            "initial",
        ]);
        git(&["tag", "1.4.0"]);

        let manager = manager_in(dir.path());
        assert_eq!(manager.update_to_latest().unwrap(), "1.4.0");
        assert_eq!(manager.persisted_version().unwrap(), "1.4.0");
    }

    #[test]
    fn package_version_is_cached_and_non_empty() {
        assert!(!package_version().is_empty());
        assert_eq!(package_version(), package_version());
    }
}
