use clap::Parser;
use cropfilter::{
    Cli, CropFilter, CropFilterError, OutputFormatter, OutputMode, RunSummary, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let cropfilter = match CropFilter::from_cli(&cli) {
        Ok(cropfilter) => cropfilter,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cropfilter);
    }

    match cropfilter.run() {
        Ok(summary) => exit_code_for_summary(&summary),
        Err(e) => {
            cropfilter.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for_summary(summary: &RunSummary) -> i32 {
    if summary.has_failures() {
        2 // Completed, but some files failed
    } else {
        0
    }
}

fn exit_code_for(error: &CropFilterError) -> i32 {
    match error {
        CropFilterError::Cancelled => 130, // Interrupted (SIGINT)
        CropFilterError::ScanFailed { .. } | CropFilterError::NotADirectory { .. } => 3,
        CropFilterError::OutputDirectory { .. } => 4,
        CropFilterError::Config { .. } => 5,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "cropfilter.toml".to_string());

    match CropFilter::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  cropfilter --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cropfilter: &CropFilter) -> i32 {
    let formatter = cropfilter.output_formatter();
    let config = cropfilter.config();

    formatter.warning("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    formatter.info("Configuration that would be used:");
    formatter.info(&format!("  Root: {}", config.scan.root.display()));
    formatter.info(&format!("  Extensions: {}", config.scan.extensions.join(", ")));
    formatter.info(&format!(
        "  Keyword: \"{}\" in field \"{}\"",
        config.filter.keyword, config.filter.field
    ));
    formatter.info(&format!(
        "  Output: {}/{}_<name>",
        config.output.directory.display(),
        config.output.prefix
    ));

    let planned = match cropfilter.plan() {
        Ok(planned) => planned,
        Err(e) => {
            cropfilter.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    formatter.print_separator();
    for file in &planned {
        match (&file.destination, &file.skip_reason) {
            (Some(destination), _) => formatter.success(&format!(
                "{} -> {}",
                file.source.display(),
                destination.display()
            )),
            (None, Some(reason)) => {
                formatter.warning(&format!("{} skipped: {}", file.source.display(), reason))
            }
            (None, None) => {
                formatter.warning(&format!("{} has no usable file name", file.source.display()))
            }
        }
    }

    formatter.print_separator();
    formatter.success(&format!("Dry run completed: {} files listed", planned.len()));

    0
}

fn print_startup_error(error: &CropFilterError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    // RUST_LOG wins over the verbosity flags
    let env = env_logger::Env::default().default_filter_or(cli.log_filter());
    if let Err(e) = env_logger::Builder::from_env(env).format_timestamp(None).try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropfilter::cli::OutputFormat;
    use cropfilter::Config;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cli_with(config: Option<PathBuf>, generate_config: bool) -> Cli {
        Cli {
            root: None,
            keyword: None,
            field: None,
            output_dir: None,
            prefix: None,
            extensions: None,
            on_missing_field: None,
            indent: None,
            report: false,
            config,
            output_format: OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            dry_run: false,
            generate_config,
        }
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let exit_code = handle_generate_config(&cli_with(Some(config_path.clone()), true));
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[filter]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("crops.json"), "[]").unwrap();

        let mut config = Config::default();
        config.scan.root = temp_dir.path().to_path_buf();
        let cropfilter =
            CropFilter::without_signal_handler(config, OutputMode::Plain, 0, true).unwrap();

        assert_eq!(handle_dry_run(&cropfilter), 0);
        assert!(!temp_dir.path().join("ProcessedJSON").exists());
    }

    #[test]
    fn test_dry_run_missing_root() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.scan.root = temp_dir.path().join("nope");
        let cropfilter =
            CropFilter::without_signal_handler(config, OutputMode::Plain, 0, true).unwrap();

        assert_eq!(handle_dry_run(&cropfilter), 3);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&CropFilterError::Cancelled), 130);
        assert_eq!(
            exit_code_for(&CropFilterError::NotADirectory {
                path: "x".to_string()
            }),
            3
        );
        assert_eq!(
            exit_code_for(&CropFilterError::Config {
                message: "bad".to_string()
            }),
            5
        );
    }
}
