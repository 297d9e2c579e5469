//! Connections Entity Module
//!
//! 사용자 간 연결(친구/팔로우) 관계를 표현하는 엔티티 모듈입니다.
//! 연결은 별도의 `connections` 컬렉션에 저장되며,
//! 사용자의 연결 집합은 양방향 조회로 파생됩니다.

pub mod connection;

pub use connection::{Connection, ConnectionStatus};
