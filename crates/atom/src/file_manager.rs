use std::io;
use std::path::PathBuf;
use tokio::fs;

use crate::config::FileConfig;
use crate::error::SessionError;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Reads and writes buffer contents. Buffer names are file names relative
/// to `base_dir`; absolute names are used as given.
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    pub fn new() -> Self {
        Self::from_config(&FileConfig::default())
    }

    pub fn from_config(config: &FileConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
        }
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub async fn read_buffer(&self, name: &str) -> Result<String, SessionError> {
        let path = self.resolve(name);

        match fs::metadata(&path).await {
            Ok(metadata) => {
                if !metadata.is_file() {
                    return Err(SessionError::FileUnreadable {
                        name: name.to_string(),
                        source: io::Error::other("指定されたパスはファイルではありません"),
                    });
                }

                if metadata.len() > LARGE_FILE_THRESHOLD {
                    log::warn!(
                        "Large file detected ({} bytes): {}",
                        metadata.len(),
                        path.display()
                    );
                }
            }
            Err(e) => return Err(Self::read_error(name, e)),
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                log::info!("Successfully read file: {}", path.display());
                Ok(content)
            }
            Err(e) => Err(Self::read_error(name, e)),
        }
    }

    pub async fn write_buffer(&self, name: &str, content: &str) -> Result<(), SessionError> {
        let path = self.resolve(name);

        match fs::write(&path, content.as_bytes()).await {
            Ok(_) => {
                log::info!("Successfully saved file: {}", path.display());
                Ok(())
            }
            Err(e) => {
                log::debug!("Failed to save {}: {}", path.display(), e);
                Err(SessionError::SaveFailed {
                    name: name.to_string(),
                    source: e,
                })
            }
        }
    }

    fn read_error(name: &str, e: io::Error) -> SessionError {
        match e.kind() {
            io::ErrorKind::NotFound => SessionError::FileNotFound {
                name: name.to_string(),
            },
            _ => {
                log::debug!("Failed to read {}: {}", name, e);
                SessionError::FileUnreadable {
                    name: name.to_string(),
                    source: e,
                }
            }
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
