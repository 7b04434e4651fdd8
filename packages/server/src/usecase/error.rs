//! UseCase 層のエラー定義と、非致命的エラーの蓄積

use std::fmt;

use thiserror::Error;

/// ブロードキャストを中断させるエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// 空（空白のみ）のメッセージ。永続化・配信の前に拒否する。
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// レジストリを列挙できず、配信対象が決まらない
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(String),
}

/// 接続受け入れのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// アクセスゲートが拒否した。レジストリ・台帳への書き込みは行われない。
    #[error("unauthorized")]
    Unauthorized,

    /// レジストリへの登録に失敗した
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// 1 回の操作中に発生した非致命的エラーの一覧
///
/// 各ステップの `Result` をここに記録し、操作の最後にまとめて返します。
/// 記録時に `warn` ログを出力します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<String>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.0.push(message);
    }

    /// `Err` なら `"{context}: {error}"` を記録して `None` を返す
    pub fn record<T, E: fmt::Display>(&mut self, context: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(format!("{}: {}", context, e));
                None
            }
        }
    }

    /// 別の一覧を取り込む（記録済みのためログは再出力しない）
    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
