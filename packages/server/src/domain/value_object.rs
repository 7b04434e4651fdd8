//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値がドメイン層に入り込まないようにします。

use std::fmt;

use chrono::{DateTime, Utc};
use kairo_shared::time::format_wire_timestamp;
use uuid::Uuid;

use super::error::ValueObjectError;

/// 接続 ID の最大長（バイト）
pub const CONNECTION_ID_MAX_LEN: usize = 128;

/// 死活確認用の制御トークン。チャットメッセージとしては扱わない。
pub const PING_TOKEN: &str = "ping";

/// 接続 ID（1 つのトランスポートセッションを識別する不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい ConnectionId を作成
    ///
    /// 空文字列（空白のみを含む）と [`CONNECTION_ID_MAX_LEN`] を超える値は拒否します。
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        if value.len() > CONNECTION_ID_MAX_LEN {
            return Err(ValueObjectError::ConnectionIdTooLong(value.len()));
        }
        Ok(Self(value))
    }

    /// ランダムな ConnectionId を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ ID（128 bit ランダム）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// メッセージ本文
///
/// 送信されたテキストをそのまま保持します。前後の空白を除いて空になる値は拒否します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::MessageEmpty);
        }
        Ok(Self(value))
    }

    /// 死活確認トークン（`"ping"` 完全一致）かどうか
    pub fn is_ping(&self) -> bool {
        self.0 == PING_TOKEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// アクセスゲートが導出したプリンシパル ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::PrincipalIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UTC タイムスタンプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// ワイヤ形式（`%Y-%m-%dT%H:%M:%SZ`）の文字列
    pub fn to_wire_string(&self) -> String {
        format_wire_timestamp(&self.0)
    }
}

/// セッション継続時間（整数秒）
///
/// 切断時刻が接続時刻より前になる場合（時計のずれ）は 0 に丸め、`was_clamped` で判別できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDuration {
    seconds: i64,
    clamped: bool,
}

impl SessionDuration {
    /// 接続時刻と切断時刻から継続時間を計算（秒未満は切り捨て）
    pub fn between(connected_at: Timestamp, disconnected_at: Timestamp) -> Self {
        let seconds = (disconnected_at.value() - connected_at.value()).num_seconds();
        if seconds < 0 {
            Self {
                seconds: 0,
                clamped: true,
            }
        } else {
            Self {
                seconds,
                clamped: false,
            }
        }
    }

    pub fn from_secs(seconds: u32) -> Self {
        Self {
            seconds: i64::from(seconds),
            clamped: false,
        }
    }

    pub fn as_secs(&self) -> i64 {
        self.seconds
    }

    pub fn was_clamped(&self) -> bool {
        self.clamped
    }
}
