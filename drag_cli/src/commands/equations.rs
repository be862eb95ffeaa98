//! List the correlation library

use anyhow::Result;
use clap::Args;
use drag_core::equations::{generate_correlations_markdown, Correlation, CorrelationFamily};

#[derive(Args)]
pub struct EquationsArgs {
    /// Print the full markdown reference instead of the name list
    #[arg(long)]
    pub markdown: bool,
}

pub fn execute(args: EquationsArgs) -> Result<()> {
    if args.markdown {
        print!("{}", generate_correlations_markdown());
        return Ok(());
    }

    for family in CorrelationFamily::ALL {
        println!("{}", family.display_name());
        for correlation in Correlation::in_family(family) {
            let meta = correlation.metadata();
            let marker = if meta.implicit { " (implicit)" } else { "" };
            println!("  {:<40} {}{}", meta.name, meta.formula_plain, marker);
        }
        println!();
    }
    Ok(())
}
