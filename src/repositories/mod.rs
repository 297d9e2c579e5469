//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! MongoDB를 주 저장소로 사용하는 리포지토리들을 제공합니다.
//! 모든 리포지토리는 프로세스 시작 시 생성된 [`Database`](crate::db::Database)
//! 핸들을 받아 구성되며, 자체적인 가변 상태나 잠금을 가지지 않습니다.
//!
//! # Features
//!
//! - 단일 컬렉션에 대한 범용 CRUD 프리미티브 ([`base::BaseRepository`])
//! - 도메인 특화 조회를 제공하는 사용자 리포지토리 ([`users::UserRepository`])
//! - 시작 시 인덱스 생성을 위한 공통 초기화 인터페이스 ([`Repository`])
//!
//! # Examples
//!
//! ```rust,ignore
//! use zion_city_backend::repositories::users::UserRepository;
//!
//! let user_repo = UserRepository::new(&database);
//! let user = user_repo.find_by_email("user@example.com").await?;
//! ```

use async_trait::async_trait;

use crate::errors::AppResult;

pub mod base;
pub mod users;

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
///
/// 리포지토리의 기본 메타데이터와 시작 시 초기화(인덱스 생성 등)를 담당합니다.
#[async_trait]
pub trait Repository: Send + Sync {
    /// 리포지토리의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션의 이름을 반환합니다.
    fn collection_name(&self) -> &str;

    /// 리포지토리 초기화 로직을 수행합니다.
    ///
    /// 데이터베이스 인덱스 생성 등 데이터 액세스와 관련된
    /// 초기화 작업을 수행합니다. 애플리케이션 시작 시 한 번 호출됩니다.
    async fn init(&self) -> AppResult<()> {
        Ok(())
    }
}
