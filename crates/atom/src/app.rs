use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command_processor::{CommandProcessor, Outcome};
use crate::config::Config;
use crate::file_manager::FileManager;
use crate::session::Session;

const BANNER: [&str; 2] = [
    "=== Atom テキストエディタ ===",
    "コマンド: open, new, list, edit, save, close, exit",
];
const FAREWELL: &str = "Atomを終了します";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    AwaitingCommand,
    /// Lines are taken verbatim until end of input commits them to `name`.
    CollectingEditLines { name: String, lines: Vec<String> },
    Terminated,
}

/// One unit of input from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    EndOfInput,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    command_processor: CommandProcessor,
    mode: Mode,
}

impl App {
    pub fn new(mut config: Config) -> Self {
        config.validate();
        let session = Session::new(FileManager::from_config(&config.files));
        Self {
            config,
            session,
            command_processor: CommandProcessor::new(),
            mode: Mode::AwaitingCommand,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.mode == Mode::Terminated
    }

    /// Applies one input to the state machine and returns the messages to
    /// print, in order.
    pub async fn handle_input(&mut self, input: Input) -> Vec<String> {
        match std::mem::replace(&mut self.mode, Mode::AwaitingCommand) {
            Mode::AwaitingCommand => match input {
                Input::Line(line) => self.handle_command(&line).await,
                Input::EndOfInput => {
                    log::info!("Input closed, shutting down");
                    self.mode = Mode::Terminated;
                    vec![FAREWELL.to_string()]
                }
            },
            Mode::CollectingEditLines { name, mut lines } => match input {
                Input::Line(line) => {
                    lines.push(line);
                    self.mode = Mode::CollectingEditLines { name, lines };
                    Vec::new()
                }
                Input::EndOfInput => {
                    log::debug!("Committing {} lines to {}", lines.len(), name);
                    match self.session.set_buffer_content(&name, lines.join("\n")) {
                        Ok(()) => vec!["編集完了".to_string()],
                        Err(e) => {
                            log::warn!("Edit commit failed: {}", e);
                            vec![e.to_string()]
                        }
                    }
                }
            },
            Mode::Terminated => {
                self.mode = Mode::Terminated;
                Vec::new()
            }
        }
    }

    async fn handle_command(&mut self, line: &str) -> Vec<String> {
        match self
            .command_processor
            .execute_command(line, &mut self.session)
            .await
        {
            Ok(Outcome::Message(message)) => vec![message],
            Ok(Outcome::Edit { name }) => {
                let message = format!(
                    "{} を編集中です。内容を入力してください (終了: Ctrl+D):",
                    name
                );
                self.mode = Mode::CollectingEditLines {
                    name,
                    lines: Vec::new(),
                };
                vec![message]
            }
            Ok(Outcome::Exit(message)) => {
                log::info!("Exit requested");
                self.mode = Mode::Terminated;
                vec![message]
            }
            Err(e) => {
                log::debug!("Command failed: {:?}", e);
                vec![e.to_string()]
            }
        }
    }

    /// Runs the read-dispatch loop until `exit` or end of input.
    ///
    /// End of input while editing only commits the edit; reading resumes
    /// afterwards, so an interactive terminal keeps going after Ctrl+D.
    /// Bytes that are not valid UTF-8 become U+FFFD instead of ending the loop.
    pub async fn run<R, W>(&mut self, mut input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.config.show_banner {
            for line in BANNER {
                output.write_all(format!("{}\n", line).as_bytes()).await?;
            }
        }

        let mut buf = Vec::new();
        while !self.should_quit() {
            if self.mode == Mode::AwaitingCommand {
                output.write_all(self.config.prompt.as_bytes()).await?;
                output.flush().await?;
            }

            buf.clear();
            let next = if input.read_until(b'\n', &mut buf).await? == 0 {
                Input::EndOfInput
            } else {
                Input::Line(decode_line(&buf))
            };

            for message in self.handle_input(next).await {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
            }
            output.flush().await?;
        }

        log::info!("Application loop ended successfully");
        Ok(())
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(Config {
            show_banner: false,
            files: FileConfig {
                base_dir: dir.path().to_path_buf(),
            },
            ..Config::default()
        })
    }

    fn line(text: &str) -> Input {
        Input::Line(text.to_string())
    }

    #[tokio::test]
    async fn test_app_creation() {
        let app = App::default();
        assert_eq!(app.mode(), &Mode::AwaitingCommand);
        assert!(!app.should_quit());
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_edit_collects_lines_until_end_of_input() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.handle_input(line("new a")).await;
        let out = app.handle_input(line("edit a")).await;
        assert_eq!(
            out,
            vec!["a を編集中です。内容を入力してください (終了: Ctrl+D):".to_string()]
        );

        // Command verbs are plain content while editing
        assert!(app.handle_input(line("x")).await.is_empty());
        assert!(app.handle_input(line("exit")).await.is_empty());
        assert!(matches!(app.mode(), Mode::CollectingEditLines { name, lines }
            if name == "a" && lines.len() == 2));

        let out = app.handle_input(Input::EndOfInput).await;
        assert_eq!(out, vec!["編集完了".to_string()]);
        assert_eq!(app.mode(), &Mode::AwaitingCommand);
        assert_eq!(app.session.content("a"), Some("x\nexit"));
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_edit_selects_buffer() {
        let mut app = App::default();
        app.handle_input(line("new a")).await;
        app.handle_input(line("new b")).await;
        app.handle_input(line("edit a")).await;
        app.handle_input(line("y")).await;
        app.handle_input(Input::EndOfInput).await;

        assert_eq!(app.session.current(), Some("a"));
        assert_eq!(app.session.content("a"), Some("y"));
        assert_eq!(app.session.content("b"), Some(""));
    }

    #[tokio::test]
    async fn test_empty_edit_clears_content() {
        let mut app = App::default();
        app.handle_input(line("new a")).await;
        app.session.set_buffer_content("a", "old".to_string()).unwrap();

        app.handle_input(line("edit a")).await;
        app.handle_input(Input::EndOfInput).await;
        assert_eq!(app.session.content("a"), Some(""));
    }

    #[tokio::test]
    async fn test_edit_unopened_buffer_stays_in_command_mode() {
        let mut app = App::default();
        let out = app.handle_input(line("edit ghost")).await;
        assert_eq!(out, vec!["ファイルが開かれていません".to_string()]);
        assert_eq!(app.mode(), &Mode::AwaitingCommand);
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut app = App::default();
        let out = app.handle_input(line("frobnicate now")).await;
        assert_eq!(out, vec!["不明なコマンド".to_string()]);
        assert_eq!(app.mode(), &Mode::AwaitingCommand);

        let out = app.handle_input(line("")).await;
        assert_eq!(out, vec!["不明なコマンド".to_string()]);
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_exit_terminates() {
        let mut app = App::default();
        let out = app.handle_input(line("exit")).await;
        assert_eq!(out, vec!["Atomを終了します".to_string()]);
        assert!(app.should_quit());

        // Nothing happens after termination
        assert!(app.handle_input(line("new a")).await.is_empty());
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_end_of_input_at_prompt_terminates() {
        let mut app = App::default();
        let out = app.handle_input(Input::EndOfInput).await;
        assert_eq!(out, vec!["Atomを終了します".to_string()]);
        assert!(app.should_quit());
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"new a\n"), "new a");
        assert_eq!(decode_line(b"new a\r\n"), "new a");
        assert_eq!(decode_line(b"last"), "last");
        assert_eq!(decode_line(b"\xff\xfe\n"), "\u{FFFD}\u{FFFD}");
    }

    #[tokio::test]
    async fn test_run_survives_invalid_utf8_during_edit() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut output = Vec::new();

        app.run(&b"new a\nedit a\nhello\n\xff\xfe\nworld\n"[..], &mut output)
            .await
            .unwrap();

        assert_eq!(
            app.session.content("a"),
            Some("hello\n\u{FFFD}\u{FFFD}\nworld")
        );
        assert!(app.should_quit());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("編集完了\n"));
    }

    #[tokio::test]
    async fn test_run_survives_invalid_utf8_command() {
        let mut app = App::default();
        let mut output = Vec::new();

        app.run(&b"\xff new\nnew b\nexit\n"[..], &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("不明なコマンド\n"));
        assert_eq!(app.session.current(), Some("b"));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_run_prints_banner_and_prompt() {
        let mut app = App::default();
        let mut output = Vec::new();
        app.run(&b"exit\n"[..], &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "=== Atom テキストエディタ ===\n\
             コマンド: open, new, list, edit, save, close, exit\n\
             \n> Atomを終了します\n"
        );
    }
}
