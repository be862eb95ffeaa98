//! Generate CORRELATIONS.md from the correlation registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-correlations
//! ```
//!
//! The generated file is written to `drag_core/src/equations/CORRELATIONS.md`.

use std::fs;
use std::path::Path;

use drag_core::equations::{generate_correlations_markdown, ALL_CORRELATIONS};

fn main() {
    println!("Generating CORRELATIONS.md ({} correlations)...", ALL_CORRELATIONS.len());

    let markdown = generate_correlations_markdown();

    // Relative to workspace root
    let output_path = Path::new("drag_core/src/equations/CORRELATIONS.md");

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
