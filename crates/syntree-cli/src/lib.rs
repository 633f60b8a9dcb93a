//! CLI logic for the syntree diagram tool.
//!
//! This module contains the core CLI logic for the syntree diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, LeafStyleArg};

use std::fs;

use log::info;

use syntree::{DiagramBuilder, SyntreeError};

/// Run the syntree CLI application
///
/// This function processes the input file through the syntree pipeline
/// and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `SyntreeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SyntreeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing tree"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    args.apply_overrides(&mut app_config);

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let tree = builder.parse(&source)?;
    let svg = builder.render_svg(&tree)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
