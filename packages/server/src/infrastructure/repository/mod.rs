//! Repository 実装
//!
//! - `inmemory`: プロセス内のマップを使った実装

pub mod inmemory;

pub use inmemory::{
    InMemoryConnectionRepository, InMemoryMessageRepository, InMemorySessionRepository,
};
