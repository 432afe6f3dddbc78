//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - colored step list with a summary line
    #[default]
    Pretty,
    /// Table format - one row per step
    Table,
    /// JSON format - structured for scripts and CI
    Json,
}
