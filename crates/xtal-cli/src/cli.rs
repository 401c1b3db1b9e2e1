use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "xtalgrid CLI - Design crystallization optimization screens from cocktail menus.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a two-axis optimization grid around one cocktail of a menu.
    Grid(GridArgs),
    /// Rank the cocktails of a menu by chemical similarity to one cocktail.
    Link(LinkArgs),
}

/// Arguments for the `grid` subcommand.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Path to the cocktail menu CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub menu: PathBuf,

    /// Well number (base 1) of the hit cocktail to optimize around.
    #[arg(short, long, required = true, value_name = "INT")]
    pub well: u32,

    /// Name of the reagent varied along the x axis.
    #[arg(long, required = true, value_name = "NAME")]
    pub x_reagent: String,

    /// Name of the reagent varied along the y axis.
    #[arg(long, required = true, value_name = "NAME")]
    pub y_reagent: String,

    /// Number of wells along the x axis.
    #[arg(long, default_value = "6", value_name = "INT")]
    pub x_wells: usize,

    /// Number of wells along the y axis.
    #[arg(long, default_value = "4", value_name = "INT")]
    pub y_wells: usize,

    /// Signed concentration step per well along the x axis (e.g. '+20 mM').
    #[arg(long, required = true, value_name = "QUANTITY")]
    pub x_step: String,

    /// Signed concentration step per well along the y axis (e.g. '-2 % w/v').
    #[arg(long, required = true, value_name = "QUANTITY")]
    pub y_step: String,

    /// Total liquid volume of each well (e.g. '200 uL').
    #[arg(long, default_value = "200 uL", value_name = "QUANTITY")]
    pub well_volume: String,

    /// Override the stock concentration of the x reagent.
    #[arg(long, value_name = "QUANTITY")]
    pub x_stock: Option<String>,

    /// Override the stock concentration of the y reagent.
    #[arg(long, value_name = "QUANTITY")]
    pub y_stock: Option<String>,

    /// Path to an optional chemistry parameter file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}

/// Arguments for the `link` subcommand.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Path to the cocktail menu CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub menu: PathBuf,

    /// Well number (base 1) of the reference cocktail.
    #[arg(short, long, required = true, value_name = "INT")]
    pub well: u32,

    /// Maximum number of similar cocktails to list.
    #[arg(short = 'n', long, default_value = "10", value_name = "INT")]
    pub count: usize,

    /// Path to an optional chemistry parameter file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}
