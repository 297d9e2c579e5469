//! 사용자 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! [`UserRepository`](user_repo::UserRepository)를 통해 MongoDB 기반
//! 사용자 데이터 관리와 연결 그래프 조회를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use zion_city_backend::repositories::users::UserRepository;
//!
//! let user_repo = UserRepository::new(&database);
//! let user = user_repo.find_by_email("user@example.com").await?;
//! ```

pub mod user_repo;

pub use user_repo::UserRepository;
