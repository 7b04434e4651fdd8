//! すべての接続を許可するアクセスゲート（ゲストモード）

use crate::domain::{AccessError, AccessGate, PrincipalId};

pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

#[derive(Debug, Default)]
pub struct OpenAccessGate;

impl AccessGate for OpenAccessGate {
    fn authorize(&self, _credential: Option<&str>) -> Result<PrincipalId, AccessError> {
        PrincipalId::new(ANONYMOUS_PRINCIPAL.to_string()).map_err(|_| AccessError::Unauthorized)
    }
}
