//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하며, 범용 문서 리포지토리의 프리미티브 위에
//! 사용자 특화 조회를 구성합니다.
//!
//! ## 특징
//!
//! - **이메일 정규화**: 모든 이메일 조회는 소문자 정규화 후 수행
//! - **리터럴 검색**: 사용자 입력을 이스케이프하여 패턴 주입 차단
//! - **연결 그래프**: `connections` 컬렉션 양방향 조회로 연결 집합 파생
//! - **데이터 무결성**: 유니크 제약 조건 및 인덱스 관리

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, IndexModel,
    bson::{DateTime, Document, doc, from_document, to_document},
    options::IndexOptions,
};

use crate::config::RepositoryConfig;
use crate::db::Database;
use crate::domain::entities::connections::{Connection, ConnectionStatus};
use crate::domain::entities::users::{BasicUserInfo, User};
use crate::errors::{AppError, AppResult};
use crate::repositories::Repository;
use crate::repositories::base::BaseRepository;
use crate::utils::string_utils::normalize_email;

/// 사용자 문서가 저장되는 컬렉션 이름
pub const USERS_COLLECTION: &str = "users";

/// 사용자 간 연결 레코드가 저장되는 컬렉션 이름
pub const CONNECTIONS_COLLECTION: &str = "connections";

/// 사용자 데이터 액세스 리포지토리
///
/// 이 리포지토리는 사용자 엔티티의 CRUD 연산과 도메인 특화 조회를 담당합니다.
/// 범용 연산은 내부의 [`BaseRepository`]에 위임하고, 사용자 조회에 필요한
/// 프로젝션/검색/연결 그래프 쿼리를 추가로 제공합니다.
///
/// ## 저장소 구성
///
/// - **`users` 컬렉션**: 사용자 문서. 인덱스: email(unique), created_at(desc)
/// - **`connections` 컬렉션**: 연결 레코드. 인덱스: (from_user_id, status), (to_user_id, status)
///
/// ## 에러 처리
///
/// 모든 메서드는 `Result<T, AppError>` 타입을 반환합니다.
///
/// - **DatabaseError**: MongoDB 연결 오류, 쿼리 실행 오류
/// - **SerializationError**: 문서 ↔ 엔티티 변환 오류
///
/// "사용자 없음"은 에러가 아니라 `None`/빈 컬렉션으로 표현됩니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use zion_city_backend::domain::entities::users::User;
/// use zion_city_backend::repositories::users::UserRepository;
///
/// async fn user_operations(repo: &UserRepository) -> Result<(), AppError> {
///     // 사용자 생성
///     let user = User::new(
///         "john@example.com".to_string(),
///         "John".to_string(),
///         "Doe".to_string(),
///     );
///     let created = repo.create(&user).await?;
///
///     // 이메일로 조회 (대소문자 무관)
///     let found = repo.find_by_email("John@Example.com").await?;
///
///     // 이름/이메일 부분 일치 검색
///     let results = repo.search("john", None, None, None).await?;
///
///     // 연결된 사용자 id 집합
///     let connected = repo.get_connections(&created.id, None).await?;
///
///     Ok(())
/// }
/// ```
pub struct UserRepository {
    /// `users` 컬렉션에 바인딩된 범용 리포지토리
    base: BaseRepository,
    /// `connections` 컬렉션 핸들
    connections: Collection<Connection>,
}

impl UserRepository {
    /// 데이터베이스 핸들로부터 리포지토리를 생성합니다.
    pub fn new(database: &Database) -> Self {
        Self {
            base: BaseRepository::new(database, USERS_COLLECTION),
            connections: database.collection::<Connection>(CONNECTIONS_COLLECTION),
        }
    }

    /// 내부 범용 리포지토리를 반환합니다.
    ///
    /// 도메인 메서드로 표현되지 않는 범용 연산(배치 조회, 집계,
    /// 소프트 삭제 등)이 필요한 호출자를 위한 통로입니다.
    pub fn base(&self) -> &BaseRepository {
        &self.base
    }

    /// 문서를 사용자 엔티티로 변환합니다.
    fn hydrate(document: Document) -> AppResult<User> {
        from_document(document).map_err(|e| AppError::SerializationError(e.to_string()))
    }

    /// 새 사용자를 저장합니다.
    ///
    /// 엔티티를 문서로 직렬화한 뒤 범용 생성 연산에 위임합니다.
    /// 이메일 중복은 유니크 인덱스 위반 시 드라이버 에러로 전파됩니다.
    pub async fn create(&self, user: &User) -> AppResult<User> {
        let document =
            to_document(user).map_err(|e| AppError::SerializationError(e.to_string()))?;
        let created = self.base.create(document).await?;

        Self::hydrate(created)
    }

    /// ID로 사용자 조회
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 ID의 사용자가 없는 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.base
            .get_by_id(user_id)
            .await?
            .map(Self::hydrate)
            .transpose()
    }

    /// 이메일 주소로 사용자 조회
    ///
    /// 이메일은 조회 전에 소문자로 정규화되므로 대소문자와 무관하게
    /// 동작합니다. 저장 시에도 동일한 정규화가 적용됩니다.
    ///
    /// # 인자
    ///
    /// * `email` - 조회할 사용자의 이메일 주소
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 이메일의 사용자가 없는 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.base
            .find_one(doc! { "email": normalize_email(email) })
            .await?
            .map(Self::hydrate)
            .transpose()
    }

    /// 이메일 주소의 사용 여부를 확인합니다.
    ///
    /// 가입/변경 시 중복 검사에 사용됩니다. 조회와 동일하게
    /// 소문자 정규화 후 비교합니다.
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.base
            .exists(doc! { "email": normalize_email(email) })
            .await
    }

    /// 검색어를 리터럴 패턴으로 감싼 대소문자 무시 정규식 조건을 만듭니다.
    ///
    /// 사용자 입력은 항상 이스케이프되어 리터럴로만 일치합니다.
    fn literal_regex(query: &str) -> Document {
        doc! { "$regex": regex::escape(query.trim()), "$options": "i" }
    }

    /// 이름/이메일 검색 필터를 구성합니다.
    fn build_search_filter(query: &str, exclude_ids: Option<&[String]>) -> Document {
        let regex = Self::literal_regex(query);
        let mut filter = doc! {
            "$or": [
                { "first_name": regex.clone() },
                { "last_name": regex.clone() },
                { "email": regex },
            ]
        };

        if let Some(ids) = exclude_ids {
            if !ids.is_empty() {
                filter.insert("id", doc! { "$nin": ids.to_vec() });
            }
        }

        filter
    }

    /// 이름 또는 이메일 부분 일치로 사용자를 검색합니다.
    ///
    /// 검색어는 `first_name`, `last_name`, `email` 필드에 대해
    /// **리터럴 이스케이프된 대소문자 무시 부분 문자열**로 일치시킵니다.
    /// 정규식 메타문자가 포함된 입력도 문자 그대로 취급됩니다.
    ///
    /// # 인자
    ///
    /// * `query` - 검색어
    /// * `limit` - 최대 결과 수 (기본값: [`RepositoryConfig::default_search_limit`])
    /// * `skip` - 건너뛸 결과 수 (기본값: 0)
    /// * `exclude_ids` - 결과에서 제외할 사용자 id 목록 (예: 자기 자신, 차단 목록)
    ///
    /// # 반환값
    ///
    /// `(first_name, last_name)` 오름차순으로 정렬된 사용자 목록
    pub async fn search(
        &self,
        query: &str,
        limit: Option<i64>,
        skip: Option<u64>,
        exclude_ids: Option<&[String]>,
    ) -> AppResult<Vec<User>> {
        let filter = Self::build_search_filter(query, exclude_ids);
        let sort = doc! { "first_name": 1, "last_name": 1 };

        let documents = self
            .base
            .find_many(
                filter,
                Some(limit.unwrap_or_else(RepositoryConfig::default_search_limit)),
                skip,
                Some(sort),
            )
            .await?;

        documents.into_iter().map(Self::hydrate).collect()
    }

    /// 기본 정보 조회에 사용되는 프로젝션
    fn basic_info_projection() -> Document {
        doc! {
            "_id": 0,
            "id": 1,
            "first_name": 1,
            "last_name": 1,
            "profile_picture": 1,
        }
    }

    /// 사용자의 기본 정보만 조회합니다.
    ///
    /// 게시물/채팅 등 다른 문서에 작성자 정보를 임베딩할 때 사용됩니다.
    /// 전체 문서 대신 `id`, `first_name`, `last_name`, `profile_picture`만
    /// 프로젝션하여 가져옵니다.
    pub async fn get_basic_info(&self, user_id: &str) -> AppResult<Option<BasicUserInfo>> {
        let found = self
            .base
            .collection()
            .find_one(doc! { "id": user_id })
            .projection(Self::basic_info_projection())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        found
            .map(|document| {
                from_document(document).map_err(|e| AppError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    /// 여러 사용자의 기본 정보를 단일 배치 쿼리로 조회합니다.
    ///
    /// # 반환값
    ///
    /// 사용자 id → 기본 정보 매핑. 존재하지 않는 id는 매핑에서 생략되며,
    /// 순서는 보장되지 않습니다. 완전성 검사는 호출자의 몫입니다.
    pub async fn get_many_basic_info(
        &self,
        user_ids: &[String],
    ) -> AppResult<HashMap<String, BasicUserInfo>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut cursor = self
            .base
            .collection()
            .find(doc! { "id": { "$in": user_ids.to_vec() } })
            .projection(Self::basic_info_projection())
            .limit(user_ids.len() as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut infos = HashMap::with_capacity(user_ids.len());
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            let info: BasicUserInfo = from_document(document)
                .map_err(|e| AppError::SerializationError(e.to_string()))?;
            infos.insert(info.id.clone(), info);
        }

        Ok(infos)
    }

    /// 마지막 로그인 시각을 현재 시각으로 기록합니다.
    ///
    /// 범용 업데이트를 우회하여 컬렉션에 직접 기록합니다.
    /// 로그인 기록은 `updated_at`을 갱신하지 않습니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(true)` - 사용자가 존재하여 기록됨
    /// * `Ok(false)` - 해당 id의 사용자가 없음
    pub async fn update_last_login(&self, user_id: &str) -> AppResult<bool> {
        let result = self
            .base
            .collection()
            .update_one(
                doc! { "id": user_id },
                doc! { "$set": { "last_login": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    /// 값이 비어 있는(Null) 필드를 제거합니다.
    fn strip_null_fields(data: Document) -> Document {
        let mut cleaned = Document::new();
        for (key, value) in data {
            if value != mongodb::bson::Bson::Null {
                cleaned.insert(key, value);
            }
        }
        cleaned
    }

    /// 사용자 프로필을 부분 업데이트합니다.
    ///
    /// `profile_data`에서 값이 Null인 필드는 제거된 뒤 범용 업데이트에
    /// 위임됩니다. Null 필드는 "변경하지 않음"을 의미하며, 기존 값을
    /// 지우지 않습니다. 변경할 필드가 하나도 남지 않으면 쓰기 없이
    /// 현재 문서를 그대로 반환합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 업데이트된(또는 변경 없이 조회된) 사용자
    /// * `Ok(None)` - 해당 id의 사용자가 없음
    pub async fn update_profile(
        &self,
        user_id: &str,
        profile_data: Document,
    ) -> AppResult<Option<User>> {
        let data = Self::strip_null_fields(profile_data);

        if data.is_empty() {
            return self.find_by_id(user_id).await;
        }

        self.base
            .update(user_id, data)
            .await?
            .map(Self::hydrate)
            .transpose()
    }

    /// 연결 집합 조회 필터를 구성합니다.
    ///
    /// 사용자가 요청자(from)든 수신자(to)든 모두 일치해야 합니다.
    fn connections_filter(user_id: &str, status: ConnectionStatus) -> Document {
        doc! {
            "status": status.as_str(),
            "$or": [
                { "from_user_id": user_id },
                { "to_user_id": user_id },
            ]
        }
    }

    /// 사용자의 연결 집합을 조회합니다.
    ///
    /// `connections` 컬렉션에서 사용자가 어느 한쪽에 참여하고 주어진
    /// 상태를 가진 레코드를 조회한 뒤, 상대방 id를 중복 제거한 집합으로
    /// 반환합니다. 순서는 보장되지 않습니다.
    ///
    /// # 인자
    ///
    /// * `user_id` - 조회할 사용자 id
    /// * `status` - 연결 상태 (기본값: [`ConnectionStatus::Accepted`])
    pub async fn get_connections(
        &self,
        user_id: &str,
        status: Option<ConnectionStatus>,
    ) -> AppResult<HashSet<String>> {
        let status = status.unwrap_or(ConnectionStatus::Accepted);

        let mut cursor = self
            .connections
            .find(Self::connections_filter(user_id, status))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut connected = HashSet::new();
        while let Some(connection) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            if let Some(other) = connection.other_party(user_id) {
                connected.insert(other.to_string());
            }
        }

        Ok(connected)
    }

    /// 주어진 역할을 가진 사용자 수를 반환합니다.
    pub async fn count_by_role(&self, role: &str) -> AppResult<u64> {
        self.base.count(Some(doc! { "role": role })).await
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 사용자/연결 컬렉션에 필요한 인덱스를 생성합니다.
    /// 애플리케이션 초기화 시점에 한 번 실행하여 쿼리 성능을 최적화합니다.
    ///
    /// # 생성되는 인덱스
    ///
    /// - `users.email` (unique): 중복 이메일 방지 및 이메일 조회 최적화
    /// - `users.created_at` (desc): 최근 가입자 조회 최적화
    /// - `connections.(from_user_id, status)` / `connections.(to_user_id, status)`:
    ///   양방향 연결 집합 조회 최적화
    pub async fn create_indexes(&self) -> AppResult<()> {
        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.base
            .collection()
            .create_indexes([email_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 연결 집합 조회용 복합 인덱스 (양방향)
        let from_index = IndexModel::builder()
            .keys(doc! { "from_user_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("from_user_status".to_string())
                    .build(),
            )
            .build();

        let to_index = IndexModel::builder()
            .keys(doc! { "to_user_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("to_user_status".to_string())
                    .build(),
            )
            .build();

        self.connections
            .create_indexes([from_index, to_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository for UserRepository {
    fn name(&self) -> &str {
        "user"
    }

    fn collection_name(&self) -> &str {
        USERS_COLLECTION
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}
