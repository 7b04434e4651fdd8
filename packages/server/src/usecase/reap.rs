//! UseCase: 配信失敗した接続の回収
//!
//! ブロードキャスト結果の失敗受信者のうち、ポリシーが対象とするものを
//! レジストリから削除し、配信チャネルからも登録解除します。
//! セッション台帳には触れません。

use std::{fmt, str::FromStr, sync::Arc};

use crate::domain::{ConnectionId, ConnectionRepository, MessagePushError, MessagePusher};

use super::{broadcast::BroadcastOutcome, error::ErrorList};

/// 回収ポリシー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReapPolicy {
    /// 回収しない（死んだ接続は切断イベントまで残る）
    Disabled,
    /// 受信者が消えていた失敗だけを回収
    #[default]
    GoneOnly,
    /// タイムアウトを含むすべての失敗を回収
    AllFailures,
}

impl ReapPolicy {
    pub fn applies_to(self, error: &MessagePushError) -> bool {
        match self {
            Self::Disabled => false,
            Self::GoneOnly => error.is_gone(),
            Self::AllFailures => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::GoneOnly => "gone-only",
            Self::AllFailures => "all-failures",
        }
    }
}

impl fmt::Display for ReapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReapPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "gone-only" | "gone" => Ok(Self::GoneOnly),
            "all-failures" | "all" => Ok(Self::AllFailures),
            other => Err(format!(
                "unknown reap policy '{}' (expected disabled, gone-only or all-failures)",
                other
            )),
        }
    }
}

/// 回収結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub reaped: Vec<ConnectionId>,
    pub errors: ErrorList,
}

pub struct ConnectionReaper {
    connections: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    policy: ReapPolicy,
}

impl ConnectionReaper {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        policy: ReapPolicy,
    ) -> Self {
        Self {
            connections,
            message_pusher,
            policy,
        }
    }

    pub fn policy(&self) -> ReapPolicy {
        self.policy
    }

    pub async fn reap(&self, outcome: &BroadcastOutcome) -> ReapReport {
        let mut report = ReapReport::default();

        let targets: Vec<ConnectionId> = outcome
            .failed()
            .filter(|(_, error)| self.policy.applies_to(error))
            .map(|(id, _)| id.clone())
            .collect();

        for connection_id in targets {
            let removed = self.connections.remove(&connection_id).await;
            self.message_pusher.unregister_client(&connection_id).await;

            if report
                .errors
                .record(&format!("failed to reap '{}'", connection_id), removed)
                .is_some()
            {
                tracing::info!("reaped stale connection '{}'", connection_id);
                report.reaped.push(connection_id);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockConnectionRepository, RepositoryError},
        usecase::{
            broadcast::DeliveryReport,
            test_support::{RecordingPusher, Stores, conn},
        },
    };

    fn outcome_with(failures: &[(&str, MessagePushError)], successes: &[&str]) -> BroadcastOutcome {
        let mut deliveries: Vec<DeliveryReport> = failures
            .iter()
            .map(|(id, e)| DeliveryReport {
                recipient: conn(id),
                result: Err(e.clone()),
            })
            .collect();
        deliveries.extend(successes.iter().map(|id| DeliveryReport {
            recipient: conn(id),
            result: Ok(()),
        }));
        BroadcastOutcome {
            deliveries,
            ..BroadcastOutcome::default()
        }
    }

    #[test]
    fn test_policy_parse() {
        // テスト項目: 文字列からポリシーを解釈できる
        // given (前提条件):
        let inputs = ["disabled", "Gone-Only", "all-failures", "nope"];

        // when (操作):
        let parsed: Vec<_> = inputs.iter().map(|s| s.parse::<ReapPolicy>()).collect();

        // then (期待する結果):
        assert_eq!(parsed[0], Ok(ReapPolicy::Disabled));
        assert_eq!(parsed[1], Ok(ReapPolicy::GoneOnly));
        assert_eq!(parsed[2], Ok(ReapPolicy::AllFailures));
        assert!(parsed[3].is_err());
        assert_eq!(ReapPolicy::default(), ReapPolicy::GoneOnly);
    }

    #[tokio::test]
    async fn test_gone_only_reaps_gone_recipients() {
        // テスト項目: GoneOnly では消えた接続だけが回収され、タイムアウトは残る
        // given (前提条件):
        let stores = Stores::with_connections(&["a", "gone", "slow"]).await;
        let pusher = Arc::new(RecordingPusher::new());
        let reaper = ConnectionReaper::new(stores.connections.clone(), pusher, ReapPolicy::GoneOnly);
        let outcome = outcome_with(
            &[
                ("gone", MessagePushError::ConnectionGone("gone".to_string())),
                ("slow", MessagePushError::Timeout("slow".to_string())),
            ],
            &["a"],
        );

        // when (操作):
        let report = reaper.reap(&outcome).await;

        // then (期待する結果):
        assert_eq!(report.reaped, vec![conn("gone")]);
        assert!(report.errors.is_empty());
        assert_eq!(
            stores.connections.list_all().await.unwrap(),
            vec![conn("a"), conn("slow")]
        );
    }

    #[tokio::test]
    async fn test_disabled_leaves_registry_untouched() {
        // テスト項目: Disabled では何も回収しない
        // given (前提条件):
        let stores = Stores::with_connections(&["a", "gone"]).await;
        let pusher = Arc::new(RecordingPusher::new());
        let reaper = ConnectionReaper::new(stores.connections.clone(), pusher, ReapPolicy::Disabled);
        let outcome = outcome_with(
            &[("gone", MessagePushError::ConnectionGone("gone".to_string()))],
            &[],
        );

        // when (操作):
        let report = reaper.reap(&outcome).await;

        // then (期待する結果):
        assert!(report.reaped.is_empty());
        assert_eq!(stores.connections.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_all_failures_reaps_timeouts_too() {
        // テスト項目: AllFailures ではタイムアウトした接続も回収される
        // given (前提条件):
        let stores = Stores::with_connections(&["slow", "broken"]).await;
        let pusher = Arc::new(RecordingPusher::new());
        let reaper =
            ConnectionReaper::new(stores.connections.clone(), pusher, ReapPolicy::AllFailures);
        let outcome = outcome_with(
            &[
                ("slow", MessagePushError::Timeout("slow".to_string())),
                (
                    "broken",
                    MessagePushError::PushFailed {
                        connection_id: "broken".to_string(),
                        reason: "closed".to_string(),
                    },
                ),
            ],
            &[],
        );

        // when (操作):
        let report = reaper.reap(&outcome).await;

        // then (期待する結果):
        assert_eq!(report.reaped.len(), 2);
        assert_eq!(stores.connections.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_failure_is_collected() {
        // テスト項目: レジストリからの削除失敗はエラー一覧に記録される
        // given (前提条件):
        let mut connections = MockConnectionRepository::new();
        connections
            .expect_remove()
            .times(1)
            .returning(|_| Err(RepositoryError::StoreUnavailable("down".to_string())));
        let pusher = Arc::new(RecordingPusher::new());
        let reaper = ConnectionReaper::new(Arc::new(connections), pusher, ReapPolicy::GoneOnly);
        let outcome = outcome_with(
            &[("gone", MessagePushError::ConnectionGone("gone".to_string()))],
            &[],
        );

        // when (操作):
        let report = reaper.reap(&outcome).await;

        // then (期待する結果):
        assert!(report.reaped.is_empty());
        assert_eq!(report.errors.len(), 1);
    }
}
