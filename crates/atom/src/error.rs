//! ユーザーに表示されるエラーの分類。
//!
//! どのエラーもインタプリタのループ内で表示されて回復される。
//! プロセスを終了させるのは `exit` コマンドだけ。

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("ファイル名を指定してください: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("ファイルが見つかりません: {name}")]
    FileNotFound { name: String },

    #[error("ファイルが見つかりません: {name}")]
    FileUnreadable {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("ファイルが開かれていません")]
    BufferNotOpen { name: String },

    #[error("ファイルが選択されていません")]
    NoBufferSelected,

    #[error("保存に失敗しました: {source}")]
    SaveFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("不明なコマンド")]
    UnknownCommand { verb: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = SessionError::FileNotFound {
            name: "missing.txt".to_string(),
        };
        assert_eq!(err.to_string(), "ファイルが見つかりません: missing.txt");

        let err = SessionError::MissingArgument {
            usage: "new <filename>",
        };
        assert_eq!(err.to_string(), "ファイル名を指定してください: new <filename>");

        assert_eq!(
            SessionError::NoBufferSelected.to_string(),
            "ファイルが選択されていません"
        );
    }

    #[test]
    fn test_unreadable_reads_as_not_found() {
        let err = SessionError::FileUnreadable {
            name: "sub".to_string(),
            source: io::Error::other("指定されたパスはファイルではありません"),
        };
        assert_eq!(err.to_string(), "ファイルが見つかりません: sub");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_command_is_bare() {
        let err = SessionError::UnknownCommand {
            verb: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "不明なコマンド");
    }

    #[test]
    fn test_save_failed_includes_cause() {
        let err = SessionError::SaveFailed {
            name: "a".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let message = err.to_string();
        assert!(message.starts_with("保存に失敗しました"));
        assert!(message.contains("permission denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
