//! Run a build-up against a vehicle and optional geometry snapshot

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use drag_core::calculations::SortOrder;
use drag_core::equations::{Correlation, CorrelationFamily};
use drag_core::file_io::{load_json, load_study_with_lock_check, save_text};
use drag_core::geometry::{DegenGeometry, Vehicle};
use drag_core::report::DragReport;
use drag_core::study::DragStudy;
use tracing::{info, warn};

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    None,
    Swet,
    Cd,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortOrder::None,
            SortArg::Swet => SortOrder::WettedArea,
            SortArg::Cd => SortOrder::PercentCd,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Vehicle component tree (JSON)
    #[arg(short, long)]
    pub vehicle: PathBuf,

    /// Degenerate geometry snapshot (JSON); without it every derived value is -1
    #[arg(short, long)]
    pub degen: Option<PathBuf>,

    /// Study file with settings, flow condition and excrescences
    #[arg(short, long)]
    pub study: Option<PathBuf>,

    /// Component ids to include (default: all)
    #[arg(long, value_delimiter = ',')]
    pub components: Vec<String>,

    /// Row order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Laminar skin friction correlation by name
    #[arg(long)]
    pub lam_cf: Option<String>,

    /// Turbulent skin friction correlation by name
    #[arg(long)]
    pub turb_cf: Option<String>,

    /// Write the CSV report here
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let start = Instant::now();

    let study = match &args.study {
        Some(path) => {
            let (study, lock) = load_study_with_lock_check(path)
                .with_context(|| format!("loading study {}", path.display()))?;
            if let Some(lock) = lock {
                warn!(user = %lock.user, pid = lock.pid, "study is locked by another user; reading only");
            }
            study
        }
        None => DragStudy::default(),
    };

    let vehicle: Vehicle =
        load_json(&args.vehicle).with_context(|| format!("loading vehicle {}", args.vehicle.display()))?;
    let geometry: Option<DegenGeometry> = match &args.degen {
        Some(path) => Some(load_json(path).with_context(|| format!("loading geometry {}", path.display()))?),
        None => {
            warn!("no geometry snapshot given; derived values will be -1");
            None
        }
    };

    let mut build_up = study.into_build_up()?;
    if let Some(sort) = args.sort {
        build_up.settings.sort_order = sort.into();
    }
    if let Some(name) = &args.lam_cf {
        match Correlation::from_name(CorrelationFamily::LaminarFriction, name) {
            Some(Correlation::Laminar(eq)) => build_up.settings.lam_cf = eq,
            _ => return Err(anyhow!("unknown laminar correlation '{}'", name)),
        }
    }
    if let Some(name) = &args.turb_cf {
        match Correlation::from_name(CorrelationFamily::TurbulentFriction, name) {
            Some(Correlation::Turbulent(eq)) => build_up.settings.turb_cf = eq,
            _ => return Err(anyhow!("unknown turbulent correlation '{}'", name)),
        }
    }

    let ids = if args.components.is_empty() {
        vehicle.all_ids()
    } else {
        args.components.clone()
    };
    build_up.select_components(&vehicle, &ids)?;
    build_up.calculate_all(&vehicle, geometry.as_ref())?;

    let report = DragReport::from_build_up(&build_up);
    println!("{}", report.summary());

    if let Some(path) = &args.csv {
        report.save_csv(path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "CSV report written");
    }
    if let Some(path) = &args.json {
        save_text(&report.to_json()?, path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }

    info!(
        rows = report.rows.len(),
        total_cd = report.totals.total_cd,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );
    Ok(())
}
