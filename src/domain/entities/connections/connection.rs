//! Connection Entity Implementation
//!
//! 두 사용자 사이의 연결 관계를 표현하는 엔티티입니다.
//! 연결 레코드는 방향성을 가지지만(요청자 → 수신자),
//! 연결 집합 조회는 양쪽 방향을 모두 검사합니다.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 연결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// 연결 요청됨 (수락 대기)
    Pending,
    /// 연결 수락됨
    Accepted,
    /// 연결 거절됨
    Rejected,
    /// 차단됨
    Blocked,
}

impl ConnectionStatus {
    /// 저장소 필터에 사용되는 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
            ConnectionStatus::Blocked => "blocked",
        }
    }
}

/// 사용자 간 연결 엔티티
///
/// `connections` 컬렉션의 문서와 1:1 매핑됩니다.
/// 사용자 참조는 문자열 `id` 값으로만 이루어지며, 이 계층은
/// 참조 무결성을 강제하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// 호출자가 부여하는 문자열 식별자 (UUID v4)
    pub id: String,
    /// 연결을 요청한 사용자 id
    pub from_user_id: String,
    /// 연결 요청을 받은 사용자 id
    pub to_user_id: String,
    /// 연결 상태
    pub status: ConnectionStatus,
    /// 생성 시각
    pub created_at: DateTime,
    /// 수정 시각
    pub updated_at: DateTime,
}

impl Connection {
    /// 새 연결 요청 생성 (Pending 상태)
    pub fn new(from_user_id: String, to_user_id: String) -> Self {
        let now = DateTime::now();

        Self {
            id: Uuid::new_v4().to_string(),
            from_user_id,
            to_user_id,
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// 상태를 지정하여 연결을 생성합니다.
    pub fn with_status(mut self, status: ConnectionStatus) -> Self {
        self.status = status;
        self
    }

    /// 주어진 사용자가 이 연결의 어느 한쪽에 참여하는지 확인
    pub fn involves(&self, user_id: &str) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }

    /// 주어진 사용자의 상대방 id를 반환합니다.
    ///
    /// 사용자가 이 연결에 참여하지 않는 경우 `None`을 반환합니다.
    pub fn other_party(&self, user_id: &str) -> Option<&str> {
        if self.from_user_id == user_id {
            Some(&self.to_user_id)
        } else if self.to_user_id == user_id {
            Some(&self.from_user_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{from_document, to_document};

    #[test]
    fn test_new_connection_starts_pending() {
        let connection = Connection::new("user-a".to_string(), "user-b".to_string());

        assert_eq!(connection.status, ConnectionStatus::Pending);
        assert_eq!(connection.created_at, connection.updated_at);
        assert!(!connection.id.is_empty());
    }

    #[test]
    fn test_other_party_is_symmetric() {
        let connection = Connection::new("user-a".to_string(), "user-b".to_string());

        assert_eq!(connection.other_party("user-a"), Some("user-b"));
        assert_eq!(connection.other_party("user-b"), Some("user-a"));
        assert_eq!(connection.other_party("user-c"), None);
    }

    #[test]
    fn test_involves() {
        let connection = Connection::new("user-a".to_string(), "user-b".to_string());

        assert!(connection.involves("user-a"));
        assert!(connection.involves("user-b"));
        assert!(!connection.involves("user-c"));
    }

    #[test]
    fn test_status_as_str_matches_serde_representation() {
        let connection = Connection::new("user-a".to_string(), "user-b".to_string())
            .with_status(ConnectionStatus::Accepted);
        let document = to_document(&connection).unwrap();

        // as_str은 저장된 문자열 표현과 항상 일치해야 한다
        assert_eq!(
            document.get_str("status").unwrap(),
            ConnectionStatus::Accepted.as_str()
        );
    }

    #[test]
    fn test_bson_round_trip() {
        let connection = Connection::new("user-a".to_string(), "user-b".to_string())
            .with_status(ConnectionStatus::Blocked);
        let document = to_document(&connection).unwrap();

        let restored: Connection = from_document(document).unwrap();
        assert_eq!(restored.id, connection.id);
        assert_eq!(restored.status, ConnectionStatus::Blocked);
    }
}
