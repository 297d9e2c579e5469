//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! ZION.CITY 플랫폼의 모든 사용자를 표현하는 통합된 사용자 모델을 제공합니다.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::string_utils::{clean_optional_string, normalize_email};

/// 신규 사용자에게 부여되는 기본 역할
pub const DEFAULT_ROLE: &str = "member";

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// `users` 컬렉션의 문서와 1:1 매핑되며, 이메일은 항상 소문자로 저장됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 호출자가 부여하는 문자열 식별자 (UUID v4)
    pub id: String,
    /// 사용자 이메일 (소문자 정규화, unique)
    pub email: String,
    /// 이름
    pub first_name: String,
    /// 성
    pub last_name: String,
    /// 프로필 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// 사용자 역할 (member, moderator, admin 등)
    pub role: String,
    /// 마지막 로그인 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime>,
    /// 소프트 삭제 여부
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    /// 소프트 삭제 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// 생성 시각
    pub created_at: DateTime,
    /// 수정 시각
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 기본 역할(member)의 사용자를 생성합니다. 이메일은 정규화되어 저장됩니다.
    pub fn new(email: String, first_name: String, last_name: String) -> Self {
        let now = DateTime::now();

        Self {
            id: Uuid::new_v4().to_string(),
            email: normalize_email(&email),
            first_name,
            last_name,
            profile_picture: None,
            role: DEFAULT_ROLE.to_string(),
            last_login: None,
            is_deleted: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 프로필 사진 URL을 설정합니다. 빈 문자열은 None으로 정리됩니다.
    pub fn with_profile_picture(mut self, url: Option<String>) -> Self {
        self.profile_picture = clean_optional_string(url);
        self
    }

    /// 역할을 설정합니다.
    pub fn with_role(mut self, role: String) -> Self {
        self.role = role;
        self
    }

    /// 표시용 전체 이름
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 소프트 삭제된 사용자인지 확인
    pub fn is_soft_deleted(&self) -> bool {
        self.is_deleted.unwrap_or(false)
    }

    /// 다른 문서에 임베딩하기 위한 경량 정보로 변환
    pub fn basic_info(&self) -> BasicUserInfo {
        BasicUserInfo {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// 사용자 기본 정보
///
/// 게시물, 채팅 등 다른 문서에 작성자 정보를 가볍게 임베딩할 때 사용되는
/// 프로젝션 타입입니다. 전체 사용자 문서 대신 4개 필드만 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicUserInfo {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document, to_document};

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "Alice@Example.COM".to_string(),
            "Alice".to_string(),
            "Kim".to_string(),
        );

        // 이메일은 소문자로 정규화된다
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, DEFAULT_ROLE);
        assert!(user.last_login.is_none());
        assert!(!user.is_soft_deleted());
        assert_eq!(user.created_at, user.updated_at);
        assert!(!user.id.is_empty());
    }

    #[test]
    fn test_new_users_have_unique_ids() {
        let a = User::new("a@example.com".to_string(), "A".to_string(), "A".to_string());
        let b = User::new("b@example.com".to_string(), "B".to_string(), "B".to_string());

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_profile_picture_cleans_empty_values() {
        let user = User::new("a@example.com".to_string(), "A".to_string(), "A".to_string())
            .with_profile_picture(Some("   ".to_string()));
        assert_eq!(user.profile_picture, None);

        let user = user.with_profile_picture(Some("  https://cdn.zion.city/p.png  ".to_string()));
        assert_eq!(
            user.profile_picture,
            Some("https://cdn.zion.city/p.png".to_string())
        );
    }

    #[test]
    fn test_full_name() {
        let user = User::new("a@example.com".to_string(), "Jin".to_string(), "Park".to_string());
        assert_eq!(user.full_name(), "Jin Park");
    }

    #[test]
    fn test_basic_info_projection() {
        let user = User::new("a@example.com".to_string(), "Jin".to_string(), "Park".to_string());
        let info = user.basic_info();

        assert_eq!(info.id, user.id);
        assert_eq!(info.first_name, "Jin");
        assert_eq!(info.last_name, "Park");
        assert_eq!(info.profile_picture, None);
    }

    #[test]
    fn test_bson_round_trip() {
        let user = User::new("a@example.com".to_string(), "Jin".to_string(), "Park".to_string());
        let document = to_document(&user).unwrap();

        // 값이 없는 선택 필드는 문서에서 생략된다
        assert!(!document.contains_key("last_login"));
        assert!(!document.contains_key("is_deleted"));
        assert!(document.contains_key("created_at"));

        let restored: User = from_document(document).unwrap();
        assert_eq!(restored.id, user.id);
        assert_eq!(restored.email, user.email);
        assert_eq!(restored.created_at, user.created_at);
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let user = User::new("a@example.com".to_string(), "Jin".to_string(), "Park".to_string());
        let mut document = to_document(&user).unwrap();
        document.insert("bio", "hello");

        let restored: User = from_document(document).unwrap();
        assert_eq!(restored.id, user.id);
    }

    #[test]
    fn test_basic_info_deserializes_without_profile_picture() {
        let document = doc! {
            "id": "user-1",
            "first_name": "Jin",
            "last_name": "Park",
        };

        let info: BasicUserInfo = from_document(document).unwrap();
        assert_eq!(info.id, "user-1");
        assert_eq!(info.profile_picture, None);
    }

    #[test]
    fn test_json_field_names() {
        let user = User::new("a@example.com".to_string(), "Jin".to_string(), "Park".to_string());
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("id").is_some());
        assert!(value.get("first_name").is_some());
        assert!(value.get("_id").is_none());
    }
}
