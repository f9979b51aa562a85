// src/main.rs
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use app_support::VERSION;
use app_support::version::{MANIFEST_FILE, STATIC_VERSION_FILE, VersionManager};

/// Build-time version stamping.
///
/// Without arguments the static version file lives at the package root and
/// the manifest one level above it; the latest reachable tag wins, falling
/// back to whatever is already persisted.
#[derive(Parser, Debug)]
#[command(
    name = "update-version",
    version = VERSION,
    about = "Stamp the latest release version into the static version file and project manifest"
)]
struct Args {
    /// Static version file to update
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Manifest whose [project] version line is rewritten
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Directory whose checkout is queried for tags
    #[arg(long)]
    repo_dir: Option<PathBuf>,

    /// Leave every manifest untouched
    #[arg(long)]
    no_manifest: bool,

    /// Write this exact version instead of resolving the latest tag
    #[arg(long)]
    set: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let package_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let version_file = args
        .version_file
        .unwrap_or_else(|| package_root.join(STATIC_VERSION_FILE));
    let manifest = if args.no_manifest {
        None
    } else {
        args.manifest
            .or_else(|| package_root.parent().map(|dir| dir.join(MANIFEST_FILE)))
    };
    let repo_dir = args.repo_dir.unwrap_or_else(|| package_root.clone());

    let mut manager = VersionManager::new(version_file).with_repo_dir(repo_dir);
    if let Some(manifest) = manifest {
        manager = manager.with_manifest(manifest);
    }

    let version = match args.set {
        Some(version) => {
            manager.set_version(&version)?;
            version
        }
        None => manager.update_to_latest()?,
    };
    log::info!("version stamped as {version}");
    Ok(())
}
