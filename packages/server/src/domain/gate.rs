//! アクセスゲート trait 定義

use super::{AccessError, PrincipalId};

/// 接続受け入れ前に資格情報を検証し、プリンシパル ID を導出する
///
/// 拒否理由は外部に区別して伝えません（すべて `AccessError::Unauthorized`）。
pub trait AccessGate: Send + Sync {
    fn authorize(&self, credential: Option<&str>) -> Result<PrincipalId, AccessError>;
}
