use crate::error::SessionError;
use crate::session::Session;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New(String),
    Open(String),
    List,
    Edit(String),
    Save,
    Close,
    Exit,
}

impl Command {
    /// Parses one input line. Verbs are case-sensitive and only the first
    /// argument token is used. A blank line is an unknown command.
    pub fn parse(line: &str) -> Result<Command, SessionError> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let name = parts.next();

        let command = match verb {
            "new" => Command::New(Self::required(name, "new <filename>")?),
            "open" => Command::Open(Self::required(name, "open <filename>")?),
            "list" => Command::List,
            "edit" => Command::Edit(Self::required(name, "edit <filename>")?),
            "save" => Command::Save,
            "close" => Command::Close,
            "exit" => Command::Exit,
            _ => {
                return Err(SessionError::UnknownCommand {
                    verb: verb.to_string(),
                })
            }
        };
        Ok(command)
    }

    fn required(name: Option<&str>, usage: &'static str) -> Result<String, SessionError> {
        name.map(str::to_string)
            .ok_or(SessionError::MissingArgument { usage })
    }
}

/// What the interpreter should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Message(String),
    /// Start collecting content lines for an open buffer.
    Edit { name: String },
    Exit(String),
}

pub struct CommandProcessor;

impl CommandProcessor {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute_command(
        &self,
        command: &str,
        session: &mut Session,
    ) -> Result<Outcome, SessionError> {
        let command = Command::parse(command)?;
        log::debug!("Executing command: {:?}", command);

        match command {
            Command::New(name) => {
                session.create_buffer(&name)?;
                Ok(Outcome::Message(format!("新しいファイルを作成: {}", name)))
            }
            Command::Open(name) => {
                session.open_buffer(&name).await?;
                Ok(Outcome::Message(format!("ファイルを開きました: {}", name)))
            }
            Command::List => {
                let mut output = String::from("開かれているファイル:");
                for (name, current) in session.list_buffers() {
                    let marker = if current { " (現在)" } else { "" };
                    output.push_str(&format!("\n  - {}{}", name, marker));
                }
                Ok(Outcome::Message(output))
            }
            Command::Edit(name) => {
                if !session.has_buffer(&name) {
                    return Err(SessionError::BufferNotOpen { name });
                }
                Ok(Outcome::Edit { name })
            }
            Command::Save => {
                let name = session.save_current().await?;
                Ok(Outcome::Message(format!("{} を保存しました", name)))
            }
            Command::Close => {
                let name = session.close_current()?;
                Ok(Outcome::Message(format!("{} を閉じました", name)))
            }
            Command::Exit => Ok(Outcome::Exit("Atomを終了します".to_string())),
        }
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}
