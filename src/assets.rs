// src/assets.rs
use std::path::{Component, Path, PathBuf};

/// Name of the icons subdirectory under the assets root.
pub const ICONS_DIR: &str = "icons";

/// Name of the styles subdirectory under the assets root.
pub const STYLES_DIR: &str = "styles";

/// Derived layout of an application assets directory.
///
/// All paths are computed once at construction and never change. The base
/// directory is not required to exist; this is pure path arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    base: PathBuf,
    icons: PathBuf,
    styles: PathBuf,
}

impl AssetPaths {
    /// Build the layout for `assets_dir`, normalizing it to an absolute path.
    pub fn new(assets_dir: impl AsRef<Path>) -> Self {
        let base = normalize(assets_dir.as_ref());
        let icons = base.join(ICONS_DIR);
        let styles = base.join(STYLES_DIR);
        Self { base, icons, styles }
    }

    /// The absolute, normalized assets directory.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// `<base>/icons`
    pub fn icon_path(&self) -> &Path {
        &self.icons
    }

    /// `<base>/styles`
    pub fn style_path(&self) -> &Path {
        &self.styles
    }
}

/// Convert a potentially relative path into an absolute one without
/// resolving symlinks, dropping `.` components and redundant separators.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    absolute
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
