//! ZION.CITY 백엔드 데이터 코어
//!
//! ZION.CITY 커뮤니티 플랫폼 백엔드의 데이터 액세스 계층입니다.
//! MongoDB 기반의 범용 문서 리포지토리와 사용자 도메인 리포지토리를 제공하며,
//! 상위 계층(핸들러, 서비스)은 이 크레이트가 반환하는 문서와 엔티티를 소비합니다.
//!
//! # Features
//!
//! - **범용 문서 리포지토리**: 단일 컬렉션에 대한 CRUD, 검색, 집계 패스스루
//! - **자동 타임스탬프**: 생성/수정 시각의 일관된 기록
//! - **소프트 삭제**: 물리 삭제 없이 삭제 마킹 지원
//! - **사용자 리포지토리**: 이메일 조회, 리터럴 검색, 연결 그래프 탐색
//! - **MongoDB**: 스키마리스 문서 영구 저장
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직 (이 크레이트 외부)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스 (BaseRepository, UserRepository)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use zion_city_backend::db::Database;
//! use zion_city_backend::repositories::users::UserRepository;
//!
//! let database = Database::new().await?;
//! let user_repo = UserRepository::new(&database);
//!
//! let user = user_repo.find_by_email("user@example.com").await?;
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod utils;
