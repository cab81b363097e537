use crate::error::{CropFilterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub keyword: String,
    pub field: String,
    pub on_missing_field: MissingFieldPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub indent: usize,
    pub write_report: bool,
    pub report_file_name: String,
}

/// What to do with an element whose name field is absent or not a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Reject the whole file.
    #[default]
    Fail,
    /// Drop the element and keep going.
    Skip,
}

impl std::str::FromStr for MissingFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(MissingFieldPolicy::Fail),
            "skip" => Ok(MissingFieldPolicy::Skip),
            other => Err(format!(
                "Unknown missing-field policy '{}' (expected 'fail' or 'skip')",
                other
            )),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            extensions: vec!["json".to_string()],
            exclude_patterns: Vec::new(),
            max_file_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keyword: "ragi".to_string(),
            field: "Cropname".to_string(),
            on_missing_field: MissingFieldPolicy::Fail,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("ProcessedJSON"),
            prefix: "Process".to_string(),
            indent: 2,
            write_report: false,
            report_file_name: "cropfilter_report.json".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CropFilterError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CropFilterError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| CropFilterError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["cropfilter.toml", ".cropfilter.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref root) = cli_args.root {
            self.scan.root = root.clone();
        }

        if let Some(ref extensions) = cli_args.extensions {
            self.scan.extensions = extensions
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(ref keyword) = cli_args.keyword {
            self.filter.keyword = keyword.clone();
        }

        if let Some(ref field) = cli_args.field {
            self.filter.field = field.clone();
        }

        if let Some(policy) = cli_args.on_missing_field {
            self.filter.on_missing_field = policy;
        }

        if let Some(ref directory) = cli_args.output_dir {
            self.output.directory = directory.clone();
        }

        if let Some(ref prefix) = cli_args.prefix {
            self.output.prefix = prefix.clone();
        }

        if let Some(indent) = cli_args.indent {
            self.output.indent = indent;
        }

        if cli_args.write_report {
            self.output.write_report = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CropFilterError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| CropFilterError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filter.keyword.is_empty() {
            return Err(config_error("Filter keyword must not be empty"));
        }

        if self.filter.field.is_empty() {
            return Err(config_error("Filter field name must not be empty"));
        }

        if self.scan.extensions.is_empty() {
            return Err(config_error("At least one file extension must be specified"));
        }

        if self.scan.max_file_size == 0 {
            return Err(config_error("Maximum file size must be greater than 0"));
        }

        for pattern in &self.scan.exclude_patterns {
            if let Err(e) = Regex::new(pattern) {
                return Err(config_error(&format!(
                    "Invalid exclude pattern '{}': {}",
                    pattern, e
                )));
            }
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(config_error("Output directory name must not be empty"));
        }

        // The output directory sits directly under the scan root; anything else
        // lets outputs land where the next run would list them as inputs.
        if !is_single_name(&self.output.directory) {
            return Err(config_error(&format!(
                "Output directory must be a single directory name under the scan root, got '{}'",
                self.output.directory.display()
            )));
        }

        if self.output.prefix.is_empty() {
            return Err(config_error("Output file prefix must not be empty"));
        }

        if self.output.prefix.contains('/') || self.output.prefix.contains('\\') {
            return Err(config_error("Output file prefix must not contain path separators"));
        }

        if self.output.write_report && self.output.report_file_name.is_empty() {
            return Err(config_error("Report file name must not be empty"));
        }

        if !self.output.report_file_name.is_empty()
            && (self.output.report_file_name.contains(['/', '\\'])
                || !is_single_name(Path::new(&self.output.report_file_name)))
        {
            return Err(config_error("Report file name must not contain path separators"));
        }

        Ok(())
    }

    /// Defaults with a relative root, as written by `--generate-config`.
    pub fn sample() -> Self {
        let mut sample_config = Self::default();
        sample_config.scan.root = PathBuf::from(".");
        sample_config
    }
}

fn is_single_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn config_error(message: &str) -> CropFilterError {
    CropFilterError::Config {
        message: message.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub extensions: Option<String>,
    pub keyword: Option<String>,
    pub field: Option<String>,
    pub on_missing_field: Option<MissingFieldPolicy>,
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub indent: Option<usize>,
    pub write_report: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    pub fn with_extensions(mut self, extensions: Option<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }

    pub fn with_field(mut self, field: Option<String>) -> Self {
        self.field = field;
        self
    }

    pub fn with_missing_field_policy(mut self, policy: Option<MissingFieldPolicy>) -> Self {
        self.on_missing_field = policy;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_write_report(mut self, write_report: bool) -> Self {
        self.write_report = write_report;
        self
    }
}
