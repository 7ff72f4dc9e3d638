use std::path::PathBuf;

const DEFAULT_PROMPT: &str = "\n> ";

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub show_banner: bool,
    pub files: FileConfig,
}

#[derive(Debug, Clone)]
pub struct FileConfig {
    /// Directory that buffer names are resolved against.
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: String::from(DEFAULT_PROMPT),
            show_banner: true,
            files: FileConfig::default(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) {
        let mut has_issues = false;

        if self.prompt.is_empty() {
            log::warn!("Empty prompt, using default");
            self.prompt = String::from(DEFAULT_PROMPT);
            has_issues = true;
        }

        if self.files.base_dir.as_os_str().is_empty() {
            log::warn!("Empty base directory, using working directory");
            self.files.base_dir = PathBuf::from(".");
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }
    }
}
