use crate::config::{CliOverrides, Config, MissingFieldPolicy};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cropfilter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Filter crop records in JSON files by a case-insensitive keyword")]
#[command(
    long_about = "CropFilter scans a directory for JSON files holding arrays of crop records, \
                  keeps the records whose name field contains a keyword (ignoring case), and \
                  writes the filtered arrays to an output subdirectory."
)]
#[command(before_help = "🌾 CropFilter - JSON Record Filter")]
#[command(after_help = "EXAMPLES:\n  \
    cropfilter\n  \
    cropfilter ./district-data --keyword ragi\n  \
    cropfilter ./data --field crop_name --keyword jowar --output-dir jowar\n  \
    cropfilter ./data --on-missing-field skip --report\n  \
    cropfilter ./data --config my-config.toml")]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Keyword to look for in the name field (case-insensitive)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Record field the keyword is matched against
    #[arg(long)]
    pub field: Option<String>,

    /// Output subdirectory, created under the scan root
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Prefix for output file names (<prefix>_<source name>)
    #[arg(long)]
    pub prefix: Option<String>,

    /// File extensions to process (comma-separated)
    #[arg(long, help = "File extensions to process (e.g., json,geojson)")]
    pub extensions: Option<String>,

    /// What to do with records lacking the name field: fail or skip
    #[arg(long, value_name = "POLICY")]
    pub on_missing_field: Option<MissingFieldPolicy>,

    /// Indentation width of output documents (0 for compact)
    #[arg(long)]
    pub indent: Option<usize>,

    /// Write a JSON run report into the output directory
    #[arg(long)]
    pub report: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without writing anything)
    #[arg(long, help = "Show what would be filtered without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// One JSON object per line
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_root(self.root.clone())
            .with_keyword(self.keyword.clone())
            .with_field(self.field.clone())
            .with_output_dir(self.output_dir.clone())
            .with_prefix(self.prefix.clone())
            .with_extensions(self.extensions.clone())
            .with_missing_field_policy(self.on_missing_field)
            .with_indent(self.indent)
            .with_write_report(self.report)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default `RUST_LOG` filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_level() {
            0 | 1 => "cropfilter=warn",
            2 => "cropfilter=debug",
            _ => "cropfilter=trace",
        }
    }
}
