pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, MissingFieldPolicy, OutputConfig, ScanConfig};
pub use error::{CropFilterError, FileError, Result, UserFriendlyError};

// Core functionality re-exports
pub use pipeline::{
    Batch, DirectoryState, FileOutcome, FileProcessor, FilterPredicate, InputRecord,
    KeywordPredicate, OutputDocument, OutputManager, ProcessedFile, RunSummary, SkippedFile,
};
pub use scanner::{DirectoryScanner, FileFilter, SkipReason};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::{Path, PathBuf};

/// Main library interface: runs the scan → filter → write pipeline.
pub struct CropFilter {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

/// What a run would do with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub skip_reason: Option<SkipReason>,
}

impl CropFilter {
    /// Create an instance that stops between files on Ctrl+C.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Self::with_shutdown(config, output_mode, verbose, quiet, shutdown)
    }

    /// Create an instance without installing a signal handler.
    pub fn without_signal_handler(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Result<Self> {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::detached())
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Result<Self> {
        config.validate()?;

        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Filters every applicable file under the configured root.
    ///
    /// The output directory is prepared first, then the root is listed, then
    /// each file goes through the pipeline one after another. Failures of the
    /// directory steps abort the run; failures of a single file are recorded
    /// in the summary and the run moves on to the next file.
    pub fn run(&self) -> Result<RunSummary> {
        self.shutdown.check_shutdown()?;

        let scanner = DirectoryScanner::new();
        let root = scanner.resolve_root(&self.config.scan.root)?;

        self.output_formatter.start_operation(&format!(
            "Filtering \"{}\" records by {} in {}",
            self.config.filter.keyword,
            self.config.filter.field,
            root.display()
        ));

        let output_manager = self.setup_output_directory(&root)?;

        let files = scanner.list_regular_files(&root)?;
        self.output_formatter
            .info(&format!("Found {} files in {}", files.len(), root.display()));

        let summary = self.process_files(&files, &root, &output_manager)?;

        if self.config.output.write_report {
            let report_path =
                output_manager.write_report(&summary, &self.config.output.report_file_name)?;
            self.output_formatter
                .info(&format!("Run report written to: {}", report_path.display()));
        }

        self.output_formatter.print_run_summary(&summary);

        Ok(summary)
    }

    fn setup_output_directory(&self, root: &Path) -> Result<OutputManager> {
        let output_manager = OutputManager::new(
            root.join(&self.config.output.directory),
            self.config.output.prefix.as_str(),
        );

        match output_manager.ensure_directory()? {
            DirectoryState::Created => self.output_formatter.info(&format!(
                "Created output directory: {}",
                output_manager.output_directory().display()
            )),
            DirectoryState::Existing => self.output_formatter.debug(&format!(
                "Using existing output directory: {}",
                output_manager.output_directory().display()
            )),
        }

        Ok(output_manager)
    }

    fn process_files(
        &self,
        files: &[PathBuf],
        root: &Path,
        output_manager: &OutputManager,
    ) -> Result<RunSummary> {
        let processor = FileProcessor::new(&self.config, output_manager);
        let notices = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));
        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);

        let mut summary = RunSummary::new(root, output_manager.output_directory());

        for (position, path) in files.iter().enumerate() {
            if let Err(e) = self.shutdown.check_shutdown() {
                file_progress.abandon_with_message("Cancelled");
                return Err(e);
            }

            ui::progress::update_file_progress(
                &file_progress,
                position as u64,
                path.file_name().and_then(|n| n.to_str()),
            );
            notices.file_started(path);

            match processor.process_file(path) {
                Ok(FileOutcome::Processed(processed)) => {
                    notices.file_written(&processed);
                    summary.record_processed(processed);
                }
                Ok(FileOutcome::Skipped(skipped)) => {
                    notices.file_skipped(&skipped);
                    summary.record_skipped(skipped);
                }
                Err(error) => {
                    log::debug!("File error detail: {:?}", error);
                    notices.file_failed(&error);
                    summary.record_failed(&error);
                }
            }
        }

        summary.finish();
        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Filtered {} files", summary.counts.processed),
            summary.elapsed(),
        );

        Ok(summary)
    }

    /// Lists what `run` would do, without creating or writing anything.
    pub fn plan(&self) -> Result<Vec<PlannedFile>> {
        let scanner = DirectoryScanner::new();
        let root = scanner.resolve_root(&self.config.scan.root)?;
        let output_manager = OutputManager::new(
            root.join(&self.config.output.directory),
            self.config.output.prefix.as_str(),
        );
        let filter = FileFilter::new(&self.config.scan);

        let planned = scanner
            .list_regular_files(&root)?
            .into_iter()
            .map(|source| match filter.check(&source) {
                Ok(()) => PlannedFile {
                    destination: output_manager.output_path_for(&source),
                    source,
                    skip_reason: None,
                },
                Err(reason) => PlannedFile {
                    source,
                    destination: None,
                    skip_reason: Some(reason),
                },
            })
            .collect();

        Ok(planned)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::sample().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &CropFilterError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Filters `root` for `keyword` with default settings and no console output.
pub fn filter_directory<P: AsRef<Path>>(root: P, keyword: &str) -> Result<RunSummary> {
    let mut config = Config::default();
    config.scan.root = root.as_ref().to_path_buf();
    config.filter.keyword = keyword.to_string();

    let cropfilter = CropFilter::without_signal_handler(config, OutputMode::Plain, 0, true)?;
    cropfilter.run()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
