//! ドメイン層
//!
//! 接続レジストリ・セッション台帳・メッセージログ・配信チャネル・アクセスゲートの
//! インターフェースと、それらが扱う値オブジェクト／エンティティを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod gate;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ConnectionState, MessageRecord, SessionRecord};
pub use error::{
    AccessError, MessagePushError, RepositoryError, StateTransitionError, ValueObjectError,
};
pub use gate::AccessGate;
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRepository, MessageRepository, SessionRepository};
#[cfg(test)]
pub use repository::{MockConnectionRepository, MockMessageRepository, MockSessionRepository};
pub use value_object::{
    ConnectionId, MessageContent, MessageId, PING_TOKEN, PrincipalId, SessionDuration, Timestamp,
};
