//! アクセスゲートの実装
//!
//! - `jwt`: HS256 の JWT を検証する
//! - `open`: すべての接続を匿名で許可する（秘密鍵が未設定の場合）

pub mod jwt;
pub mod open;

pub use jwt::JwtAccessGate;
pub use open::OpenAccessGate;
