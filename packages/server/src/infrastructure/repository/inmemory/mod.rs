//! InMemory Repository 実装
//!
//! ストアごとに 1 つの `tokio::sync::Mutex` で保護し、クリティカルセクションは
//! 単一キーの操作（`list_all` はスナップショットのコピー）に限定します。

pub mod connection;
pub mod message;
pub mod session;

pub use connection::InMemoryConnectionRepository;
pub use message::InMemoryMessageRepository;
pub use session::InMemorySessionRepository;
