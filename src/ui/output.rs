use crate::error::{CropFilterError, FileError, UserFriendlyError};
use crate::pipeline::{ProcessedFile, RunSummary, SkippedFile};
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SKIP: Emoji = Emoji("⏭️  ", "- ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // Per-file notices
    pub fn file_started(&self, path: &Path) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("  {} {}", style("Processing:").dim(), path.display());
                } else {
                    println!("  Processing: {}", path.display());
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "file",
                "event": "started",
                "path": path,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => println!("PROCESSING: {}", path.display()),
        }
    }

    pub fn file_written(&self, file: &ProcessedFile) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                let message = format!(
                    "Filtered data written to: {} ({} of {} records)",
                    file.output.display(),
                    file.records_matched,
                    file.records_read
                );
                self.print_human_message(MessageType::Success, &message);
                if file.records_excluded > 0 {
                    self.print_human_message(
                        MessageType::Warning,
                        &format!(
                            "{} records without a usable name field were excluded",
                            file.records_excluded
                        ),
                    );
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "file",
                "event": "written",
                "path": file.source,
                "output": file.output,
                "records_read": file.records_read,
                "records_matched": file.records_matched,
                "records_excluded": file.records_excluded,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => {
                println!("WRITTEN: {}", file.output.display());
                if file.records_excluded > 0 {
                    println!("EXCLUDED: {} records", file.records_excluded);
                }
            }
        }
    }

    pub fn file_skipped(&self, file: &SkippedFile) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                let message = format!("Skipping {}: {}", file.path.display(), file.reason);
                if self.use_colors {
                    println!("{}{}", SKIP, style(message).dim());
                } else {
                    println!("- {}", message);
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "file",
                "event": "skipped",
                "path": file.path,
                "reason": file.reason,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => println!("SKIPPED: {} ({})", file.path.display(), file.reason),
        }
    }

    pub fn file_failed(&self, error: &FileError) {
        match self.mode {
            OutputMode::Human => self.print_human_message(
                MessageType::Error,
                &format!("Error processing {}", error),
            ),
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "file",
                "event": "failed",
                "path": error.path(),
                "kind": error.kind(),
                "message": error.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => eprintln!("FAILED: {}", error),
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &CropFilterError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_run_summary(&self, summary: &RunSummary) {
        match self.mode {
            // The JSON summary is the machine-readable result; emit it even when quiet.
            OutputMode::Json => {
                let mut value = serde_json::to_value(summary).unwrap_or_default();
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), serde_json::json!("summary"));
                }
                self.print_json_object(&value);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Plain => self.print_plain_summary(summary),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, summary: &RunSummary) {
        println!();
        self.print_separator();

        let headline = if summary.has_failures() {
            "Filtering completed with errors"
        } else {
            "Filtering completed!"
        };

        if self.use_colors {
            let styled = if summary.has_failures() {
                style(headline).yellow().bold()
            } else {
                style(headline).green().bold()
            };
            println!("{} {}", styled, if summary.has_failures() { WARNING } else { CHECKMARK });
        } else {
            println!("{}", headline);
        }

        println!();
        let rows = [
            ("Files written:  ", summary.counts.processed.to_string()),
            ("Files skipped:  ", summary.counts.skipped.to_string()),
            ("Files failed:   ", summary.counts.failed.to_string()),
            ("Records matched:", summary.records_matched().to_string()),
            ("Time taken:     ", format_duration(summary.elapsed())),
        ];
        for (label, value) in rows {
            if self.use_colors {
                println!("  {} {}", label, style(value).cyan().bold());
            } else {
                println!("  {} {}", label, value);
            }
        }
        println!("  Output:          {}", summary.output_directory.display());

        if summary.has_failures() {
            println!();
            println!("Failed files:");
            for failed in &summary.failed {
                println!("  - {}", failed.message);
            }
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, summary: &RunSummary) {
        println!("COMPLETED: Filtering");
        println!("Files written: {}", summary.counts.processed);
        println!("Files skipped: {}", summary.counts.skipped);
        println!("Files failed: {}", summary.counts.failed);
        println!("Records matched: {}", summary.records_matched());
        println!("Duration: {:?}", summary.elapsed());
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

// Routes notices around the progress bar so lines don't tear it.
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn file_started(&self, path: &Path) {
        self.suspend_and_print(|f| f.file_started(path));
    }

    pub fn file_written(&self, file: &ProcessedFile) {
        self.suspend_and_print(|f| f.file_written(file));
    }

    pub fn file_skipped(&self, file: &SkippedFile) {
        self.suspend_and_print(|f| f.file_skipped(file));
    }

    pub fn file_failed(&self, error: &FileError) {
        self.suspend_and_print(|f| f.file_failed(error));
    }
}
