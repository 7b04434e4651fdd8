//! JWT（HS256）を検証するアクセスゲート
//!
//! - 先頭の `Bearer ` は大文字小文字を区別せずに取り除く
//! - `exp` は必須
//! - `user_id` クレームがプリンシパル ID になる（空文字は拒否）

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{AccessError, AccessGate, PrincipalId};

const BEARER_PREFIX: &str = "bearer ";

/// 検証対象のクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub user_id: Option<String>,
    pub exp: u64,
}

pub struct JwtAccessGate {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAccessGate {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

fn strip_bearer(credential: &str) -> &str {
    let trimmed = credential.trim();
    match trimmed.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            trimmed[BEARER_PREFIX.len()..].trim_start()
        }
        _ => trimmed,
    }
}

impl AccessGate for JwtAccessGate {
    fn authorize(&self, credential: Option<&str>) -> Result<PrincipalId, AccessError> {
        let token = credential.map(strip_bearer).filter(|t| !t.is_empty());
        let Some(token) = token else {
            tracing::debug!("no credential presented");
            return Err(AccessError::Unauthorized);
        };

        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!("token rejected: {}", e);
                AccessError::Unauthorized
            })?
            .claims;

        claims
            .user_id
            .and_then(|user_id| PrincipalId::new(user_id).ok())
            .ok_or(AccessError::Unauthorized)
    }
}
