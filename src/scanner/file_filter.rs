use crate::config::ScanConfig;
use regex::Regex;
use std::path::Path;

/// Why a listed file was not handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension(String),
    NoExtension,
    Excluded(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnsupportedExtension(ext) => write!(f, "unsupported extension .{}", ext),
            SkipReason::NoExtension => write!(f, "no file extension"),
            SkipReason::Excluded(pattern) => write!(f, "matches exclude pattern {}", pattern),
        }
    }
}

pub struct FileFilter {
    extensions: Vec<String>,
    max_file_size: u64,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        // Invalid patterns are rejected by Config::validate before we get here.
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size: config.max_file_size,
            exclude_patterns,
        }
    }

    /// Decides whether a file should go through the pipeline.
    pub fn check(&self, path: &Path) -> Result<(), SkipReason> {
        if let Some(filename) = path.file_name().and_then(|s| s.to_str()) {
            if let Some(pattern) = self.matching_pattern(filename) {
                return Err(SkipReason::Excluded(pattern.to_string()));
            }
        }

        match path.extension().and_then(|s| s.to_str()) {
            Some(extension) => {
                let ext_lower = extension.to_lowercase();
                if self.extensions.contains(&ext_lower) {
                    Ok(())
                } else {
                    Err(SkipReason::UnsupportedExtension(extension.to_string()))
                }
            }
            None => Err(SkipReason::NoExtension),
        }
    }

    pub fn is_applicable(&self, path: &Path) -> bool {
        self.check(path).is_ok()
    }

    pub fn is_size_allowed(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    fn matching_pattern(&self, filename: &str) -> Option<&str> {
        self.exclude_patterns
            .iter()
            .find(|pattern| pattern.is_match(filename))
            .map(|pattern| pattern.as_str())
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> ScanConfig {
        ScanConfig {
            root: ".".into(),
            extensions: vec!["json".to_string(), ".GeoJSON".to_string()],
            exclude_patterns: vec![r"^draft_.*".to_string(), r".*\.bak\.json$".to_string()],
            max_file_size: 1024,
        }
    }

    #[test]
    fn test_extension_detection() {
        let filter = FileFilter::new(&create_test_config());

        assert!(filter.is_applicable(Path::new("/data/crops.json")));
        assert!(filter.is_applicable(Path::new("/data/fields.geojson")));
        assert!(filter.is_applicable(Path::new("/data/CROPS.JSON")));

        assert_eq!(
            filter.check(Path::new("/data/notes.txt")),
            Err(SkipReason::UnsupportedExtension("txt".to_string()))
        );
        assert_eq!(filter.check(Path::new("/data/Makefile")), Err(SkipReason::NoExtension));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = FileFilter::new(&create_test_config());

        assert!(matches!(
            filter.check(Path::new("/data/draft_crops.json")),
            Err(SkipReason::Excluded(_))
        ));
        assert!(matches!(
            filter.check(Path::new("/data/crops.bak.json")),
            Err(SkipReason::Excluded(_))
        ));
        assert!(filter.is_applicable(Path::new("/data/final_crops.json")));
    }

    #[test]
    fn test_size_limits() {
        let filter = FileFilter::new(&create_test_config());

        assert!(filter.is_size_allowed(512));
        assert!(filter.is_size_allowed(1024));
        assert!(!filter.is_size_allowed(1025));
    }

    #[test]
    fn test_default_filter_accepts_only_json() {
        let filter = FileFilter::default();
        assert!(filter.is_applicable(Path::new("a.json")));
        assert!(!filter.is_applicable(Path::new("a.csv")));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::UnsupportedExtension("csv".to_string()).to_string(),
            "unsupported extension .csv"
        );
        assert_eq!(SkipReason::NoExtension.to_string(), "no file extension");
    }
}
