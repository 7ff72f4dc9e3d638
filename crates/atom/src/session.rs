//! 開いているバッファの集合と現在選択中のバッファ。
//!
//! `current` は常に `buffers` 内の名前を指すか `None` のどちらか。

use crate::error::SessionError;
use crate::file_manager::FileManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub name: String,
    pub content: String,
}

pub struct Session {
    buffers: Vec<Buffer>,
    current: Option<String>,
    file_manager: FileManager,
}

impl Session {
    pub fn new(file_manager: FileManager) -> Self {
        Self {
            buffers: Vec::new(),
            current: None,
            file_manager,
        }
    }

    /// Creates an empty buffer and selects it. An existing buffer with the
    /// same name is silently replaced.
    pub fn create_buffer(&mut self, name: &str) -> Result<(), SessionError> {
        if name.is_empty() {
            return Err(SessionError::MissingArgument {
                usage: "new <filename>",
            });
        }

        if self.has_buffer(name) {
            log::debug!("Replacing existing buffer with empty content: {}", name);
        }
        self.insert(name, String::new());
        self.current = Some(name.to_string());
        log::info!("Created buffer: {}", name);
        Ok(())
    }

    /// Loads `name` from disk and selects it. Nothing changes on failure.
    pub async fn open_buffer(&mut self, name: &str) -> Result<(), SessionError> {
        if name.is_empty() {
            return Err(SessionError::MissingArgument {
                usage: "open <filename>",
            });
        }

        let content = self.file_manager.read_buffer(name).await?;
        self.insert(name, content);
        self.current = Some(name.to_string());
        log::info!("Opened buffer: {}", name);
        Ok(())
    }

    /// Buffer names in insertion order, paired with whether each is current.
    pub fn list_buffers(&self) -> Vec<(&str, bool)> {
        self.buffers
            .iter()
            .map(|b| (b.name.as_str(), self.current.as_deref() == Some(b.name.as_str())))
            .collect()
    }

    pub fn set_buffer_content(&mut self, name: &str, content: String) -> Result<(), SessionError> {
        let buffer = self
            .buffers
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| SessionError::BufferNotOpen {
                name: name.to_string(),
            })?;

        log::debug!("Replacing content of {} ({} bytes)", name, content.len());
        buffer.content = content;
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Writes the current buffer to the file named after it. The in-memory
    /// content is left untouched either way.
    pub async fn save_current(&self) -> Result<&str, SessionError> {
        let name = self.current.as_deref().ok_or(SessionError::NoBufferSelected)?;
        let content = self.content(name).unwrap_or_default();

        self.file_manager.write_buffer(name, content).await?;
        log::info!("Saved buffer: {}", name);
        Ok(name)
    }

    /// Drops the current buffer from memory and clears the selection. The
    /// file on disk is not touched.
    pub fn close_current(&mut self) -> Result<String, SessionError> {
        let name = self.current.take().ok_or(SessionError::NoBufferSelected)?;
        self.buffers.retain(|b| b.name != name);
        log::info!("Closed buffer: {}", name);
        Ok(name)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.buffers
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.content.as_str())
    }

    pub fn has_buffer(&self, name: &str) -> bool {
        self.buffers.iter().any(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    fn insert(&mut self, name: &str, content: String) {
        match self.buffers.iter_mut().find(|b| b.name == name) {
            Some(buffer) => buffer.content = content,
            None => self.buffers.push(Buffer {
                name: name.to_string(),
                content,
            }),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FileManager::new())
    }
}
