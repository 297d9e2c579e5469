//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 데이터 액세스 계층을 위한 통합 에러 처리 시스템입니다.
//! `thiserror`를 사용하여 타입 안전하고 일관된 에러 처리를 제공합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn load_user(user_id: &str) -> Result<User, AppError> {
//!     let user = user_repo.find_by_id(user_id).await?
//!         .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
//!
//!     Ok(user)
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 데이터 액세스 계층에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 저장소 드라이버 에러는 재시도 없이 그대로 래핑되어 호출자에게 전파되며,
/// "문서를 찾지 못함"은 에러가 아니라 `None`/빈 컬렉션으로 표현됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (MongoDB 연결, 쿼리 실행 오류)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// BSON 직렬화/역직렬화 에러
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 입력값 검증 에러
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (유니크 인덱스 위반 등)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let error = AppError::DatabaseError("connection refused".to_string());
        assert_eq!(error.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_not_found_display() {
        let error = AppError::NotFound("User not found".to_string());
        assert_eq!(error.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_serialization_error_display() {
        let error = AppError::SerializationError("missing field `id`".to_string());
        assert_eq!(error.to_string(), "Serialization error: missing field `id`");
    }

    #[test]
    fn test_validation_error_display() {
        let error = AppError::ValidationError("Email is required".to_string());
        assert_eq!(error.to_string(), "Validation error: Email is required");
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_error_with_context_lazy() {
        let result: Result<(), &str> = Err("boom");
        let app_result = result.with_context(|| format!("while loading {}", "users"));

        assert!(matches!(app_result, Err(AppError::InternalError(_))));
    }
}
