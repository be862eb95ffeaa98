//! Create a study file with default settings

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use drag_core::file_io::{save_study, FileLock, STUDY_EXTENSION};
use drag_core::study::DragStudy;
use tracing::info;

#[derive(Args)]
pub struct InitArgs {
    /// Study file to create (.dbu is appended when there is no extension)
    pub path: PathBuf,

    /// Study name (defaults to the file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Reference area in model length units squared
    #[arg(long)]
    pub sref: Option<f64>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let mut path = args.path;
    if path.extension().is_none() {
        path.set_extension(STUDY_EXTENSION);
    }
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let name = args.name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let mut study = DragStudy::new(name);
    if let Some(sref) = args.sref {
        study.settings.sref = sref;
    }
    study.settings.validate()?;

    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "drag_cli".to_string());
    let _lock = FileLock::acquire(&path, user)?;
    save_study(&study, &path).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), name = %study.meta.name, "study created");
    Ok(())
}
