//! Command-line argument definitions for the syntree CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity, and per-run layout overrides.

use clap::{Parser, ValueEnum};

use syntree::config::{AppConfig, LeafStyle};

/// Command-line arguments for the syntree diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input file in bracket notation
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// How leaves are connected to their parents
    #[arg(long, value_enum)]
    pub leaf_style: Option<LeafStyleArg>,

    /// Keep the packed, left-aligned layout instead of centering parents
    #[arg(long)]
    pub no_symmetrize: bool,

    /// Font size in pixels
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub font_size: Option<u16>,
}

impl Args {
    /// Applies the layout flags given on the command line on top of `config`.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        let layout = config.layout_mut();
        if let Some(leaf_style) = self.leaf_style {
            layout.set_leaf_style(leaf_style.into());
        }
        if self.no_symmetrize {
            layout.set_symmetrize(false);
        }
        if let Some(font_size) = self.font_size {
            layout.set_font_size(font_size);
        }
    }
}

/// Command-line spelling of [`LeafStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeafStyleArg {
    Nothing,
    Auto,
    Always,
}

impl From<LeafStyleArg> for LeafStyle {
    fn from(arg: LeafStyleArg) -> Self {
        match arg {
            LeafStyleArg::Nothing => Self::Nothing,
            LeafStyleArg::Auto => Self::Auto,
            LeafStyleArg::Always => Self::Always,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["syntree", "tree.txt"]);
        assert_eq!(args.input, "tree.txt");
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
        assert!(args.leaf_style.is_none());
        assert!(!args.no_symmetrize);
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "syntree",
            "tree.txt",
            "--leaf-style",
            "always",
            "--no-symmetrize",
            "--font-size",
            "24",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.layout().leaf_style(), LeafStyle::Always);
        assert!(!config.layout().symmetrize());
        assert_eq!(config.layout().font_size(), 24.0);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = Args::parse_from(["syntree", "tree.txt"]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.layout(), AppConfig::default().layout());
    }

    #[test]
    fn test_rejects_zero_font_size() {
        assert!(Args::try_parse_from(["syntree", "tree.txt", "--font-size", "0"]).is_err());
    }
}
