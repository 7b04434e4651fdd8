//! Infrastructure 層
//!
//! ドメイン層の trait（Repository, MessagePusher, AccessGate）の具体的な実装と、
//! ワイヤーフォーマットの DTO を提供します。

pub mod access_gate;
pub mod dto;
pub mod message_pusher;
pub mod repository;
