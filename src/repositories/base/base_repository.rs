//! # 범용 문서 리포지토리 구현
//!
//! 단일 MongoDB 컬렉션에 대한 공통 CRUD 연산을 담당하는 리포지토리입니다.
//! 도메인별 리포지토리(사용자, 게시물 등)는 이 타입을 조합하여
//! 자신의 특화 조회를 구성합니다.
//!
//! ## 특징
//!
//! - **자동 타임스탬프**: 생성 시 `created_at`/`updated_at` 기록, 변경 시 `updated_at` 갱신
//! - **저장소 키 위생**: CRUD 읽기 결과에서 MongoDB 내부 `_id`를 항상 제거
//! - **소프트 삭제**: 물리 삭제 없이 삭제 마킹 필드 기록
//! - **집계 패스스루**: 파이프라인 스테이지를 검사 없이 저장소로 전달
//!
//! ## 계약
//!
//! 이 계층은 기계적인 패스스루와 타임스탬프/정리 부기만 수행합니다.
//! 데이터 내용 검증, 재시도, 잠금, 트랜잭션은 제공하지 않으며,
//! 동시 갱신은 마지막 쓰기가 이기는(last-write-wins) 의미론을 가집니다.
//! 드라이버 에러는 [`AppError::DatabaseError`]로 래핑되어 그대로 전파됩니다.

use std::collections::HashMap;

use futures_util::TryStreamExt;
use log::debug;
use mongodb::{
    Collection,
    bson::{DateTime, Document, doc},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::config::RepositoryConfig;
use crate::db::Database;
use crate::errors::{AppError, AppResult};

/// 범용 문서 데이터 액세스 리포지토리
///
/// 하나의 논리적 컬렉션에 바인딩되어 균일한 CRUD/검색 프리미티브를 제공합니다.
///
/// ## 문서 규칙
///
/// - `id`: 호출자가 부여한 문자열 식별자. 컬렉션 내에서 유일해야 하며,
///   유일성 보장은 상위 계층의 책임입니다.
/// - `created_at` / `updated_at`: UTC 타임스탬프. `created_at`은 생성 시
///   한 번만 기록되고(이미 존재하면 보존) 이후 변경되지 않습니다.
/// - 읽기 결과에서 MongoDB 내부 `_id`는 항상 제거됩니다. 호출자는
///   저장소 고유 키를 볼 수 없습니다. 단, [`aggregate`](Self::aggregate)의
///   결과는 정리 없이 그대로 반환됩니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use mongodb::bson::doc;
/// use zion_city_backend::repositories::base::BaseRepository;
///
/// let posts = BaseRepository::new(&database, "posts");
///
/// let created = posts.create(doc! { "id": "post-1", "title": "hello" }).await?;
/// let found = posts.get_by_id("post-1").await?;
/// let updated = posts.update("post-1", doc! { "title": "hello again" }).await?;
/// let removed = posts.delete("post-1").await?;
/// ```
pub struct BaseRepository {
    /// 바인딩된 MongoDB 컬렉션
    collection: Collection<Document>,
    /// 컬렉션 이름
    collection_name: String,
}

impl BaseRepository {
    /// 지정된 컬렉션에 바인딩된 리포지토리를 생성합니다.
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection::<Document>(collection_name),
            collection_name: collection_name.to_string(),
        }
    }

    /// 바인딩된 컬렉션 핸들을 반환합니다.
    ///
    /// 프로젝션 등 프리미티브가 제공하지 않는 저장소 연산이 필요한
    /// 도메인 리포지토리에서 사용됩니다.
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    /// 컬렉션 이름을 반환합니다.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// 문서에서 저장소 내부 키(`_id`)를 제거합니다.
    fn clean(mut document: Document) -> Document {
        document.remove("_id");
        document
    }

    /// 삽입 대상 문서에 타임스탬프를 기록합니다.
    ///
    /// `created_at`은 문서에 이미 존재하면 보존되고, `updated_at`은 항상 기록됩니다.
    fn stamp_for_insert(document: &mut Document, now: DateTime) {
        if !document.contains_key("created_at") {
            document.insert("created_at", now);
        }
        document.insert("updated_at", now);
    }

    /// 변경 데이터의 `updated_at`을 갱신합니다.
    fn stamp_for_update(data: &mut Document, now: DateTime) {
        data.insert("updated_at", now);
    }

    /// 문서들을 요청된 id 순서로 재배열합니다.
    ///
    /// 저장소가 반환한 순서는 무시되며, 입력 id 순서가 보존됩니다.
    /// 존재하지 않는 id는 조용히 생략되고, 같은 문서가 중복 반환되지 않습니다.
    fn order_by_ids(documents: Vec<Document>, ids: &[String]) -> Vec<Document> {
        let mut by_id: HashMap<String, Document> = HashMap::with_capacity(documents.len());
        for document in documents {
            if let Ok(id) = document.get_str("id") {
                by_id.insert(id.to_string(), document);
            }
        }

        ids.iter().filter_map(|id| by_id.remove(id)).collect()
    }

    /// `id` 필드로 단일 문서를 조회합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(Document))` - 문서를 찾은 경우 (`_id` 제거됨)
    /// * `Ok(None)` - 해당 id의 문서가 없는 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Document>> {
        self.find_one(doc! { "id": id }).await
    }

    /// 필터와 일치하는 첫 번째 문서를 조회합니다.
    ///
    /// 여러 문서가 일치하는 경우 어떤 문서가 반환되는지는 저장소의
    /// 순서에 따릅니다.
    pub async fn find_one(&self, filter: Document) -> AppResult<Option<Document>> {
        let found = self
            .collection
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(found.map(Self::clean))
    }

    /// 필터와 일치하는 문서들을 조회합니다.
    ///
    /// # 인자
    ///
    /// * `filter` - MongoDB 필터 표현식
    /// * `limit` - 최대 문서 수 (기본값: [`RepositoryConfig::default_list_limit`])
    /// * `skip` - 건너뛸 문서 수 (기본값: 0)
    /// * `sort` - 정렬 기준 (예: `doc! { "created_at": -1 }`)
    ///
    /// # 반환값
    ///
    /// 일치하는 문서가 없으면 빈 벡터를 반환합니다.
    pub async fn find_many(
        &self,
        filter: Document,
        limit: Option<i64>,
        skip: Option<u64>,
        sort: Option<Document>,
    ) -> AppResult<Vec<Document>> {
        let mut find = self
            .collection
            .find(filter)
            .limit(limit.unwrap_or_else(RepositoryConfig::default_list_limit))
            .skip(skip.unwrap_or(0));

        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let mut cursor = find
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            documents.push(Self::clean(document));
        }

        Ok(documents)
    }

    /// 여러 id의 문서를 단일 배치 쿼리로 조회합니다.
    ///
    /// # 반환값
    ///
    /// **입력 id와 같은 순서**의 문서 벡터. 존재하지 않는 id는 조용히
    /// 생략되며, 반환된 문서 수가 요청한 id 수와 다를 수 있으므로
    /// 완전성 검사는 호출자의 몫입니다.
    pub async fn get_many_by_ids(&self, ids: &[String]) -> AppResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! { "id": { "$in": ids.to_vec() } };
        let documents = self
            .find_many(filter, Some(ids.len() as i64), None, None)
            .await?;

        Ok(Self::order_by_ids(documents, ids))
    }

    /// 필터와 일치하는 문서 수를 반환합니다.
    ///
    /// 필터가 `None`이면 컬렉션 전체를 셉니다.
    pub async fn count(&self, filter: Option<Document>) -> AppResult<u64> {
        self.collection
            .count_documents(filter.unwrap_or_default())
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 필터와 일치하는 문서의 존재 여부를 확인합니다.
    ///
    /// 전체 문서를 가져오는 대신 `_id`만 프로젝션하는 단건 조회로 구현됩니다.
    pub async fn exists(&self, filter: Document) -> AppResult<bool> {
        let found = self
            .collection
            .find_one(filter)
            .projection(doc! { "_id": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }

    /// 새 문서를 생성합니다.
    ///
    /// `created_at`(없는 경우)과 `updated_at`을 기록한 뒤 삽입하고,
    /// 타임스탬프가 기록된 문서를 반환합니다.
    ///
    /// id 충돌 검사는 수행하지 않습니다. 유니크 인덱스가 걸린 필드가
    /// 충돌하면 드라이버 에러가 그대로 전파됩니다.
    pub async fn create(&self, data: Document) -> AppResult<Document> {
        let mut document = data;
        Self::stamp_for_insert(&mut document, DateTime::now());

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        debug!("문서 생성 완료 - collection: {}", self.collection_name);

        Ok(Self::clean(document))
    }

    /// 여러 문서를 한 번에 생성합니다.
    ///
    /// 모든 문서에 동일한 시각의 타임스탬프가 기록됩니다.
    /// 빈 입력은 저장소 호출 없이 빈 벡터를 반환합니다.
    pub async fn create_many(&self, docs: Vec<Document>) -> AppResult<Vec<Document>> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let now = DateTime::now();
        let mut documents = docs;
        for document in &mut documents {
            Self::stamp_for_insert(document, now);
        }

        self.collection
            .insert_many(&documents)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        debug!(
            "문서 {}건 생성 완료 - collection: {}",
            documents.len(),
            self.collection_name
        );

        Ok(documents.into_iter().map(Self::clean).collect())
    }

    /// 문서를 부분 업데이트합니다.
    ///
    /// `data`에 포함된 필드만 `$set`으로 변경되며, 포함되지 않은 필드는
    /// 건드리지 않습니다. `updated_at`은 항상 갱신됩니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(Document))` - 업데이트된 문서 (업데이트 이후 상태)
    /// * `Ok(None)` - 해당 id의 문서가 존재하지 않음 (쓰기 없음)
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn update(&self, id: &str, data: Document) -> AppResult<Option<Document>> {
        let mut data = data;
        Self::stamp_for_update(&mut data, DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(doc! { "id": id }, doc! { "$set": data })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(updated.map(Self::clean))
    }

    /// 필터와 일치하는 모든 문서를 부분 업데이트합니다.
    ///
    /// # 반환값
    ///
    /// 실제로 변경된 문서 수
    pub async fn update_many(&self, filter: Document, data: Document) -> AppResult<u64> {
        let mut data = data;
        Self::stamp_for_update(&mut data, DateTime::now());

        let result = self
            .collection
            .update_many(filter, doc! { "$set": data })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    /// 필터와 일치하는 문서를 업데이트하거나, 없으면 새로 삽입합니다.
    ///
    /// 삽입되는 경우 필터의 동등 조건 필드들이 새 문서에 병합되며,
    /// `created_at`은 `$setOnInsert`로 삽입 시에만 기록됩니다.
    /// 기존 문서가 업데이트되는 경우 `created_at`은 변경되지 않습니다.
    ///
    /// # 반환값
    ///
    /// 연산 이후의 문서 (삽입 또는 업데이트 결과)
    pub async fn upsert(&self, filter: Document, data: Document) -> AppResult<Document> {
        let now = DateTime::now();
        let mut data = data;
        // created_at은 $setOnInsert로만 기록한다
        data.remove("created_at");
        Self::stamp_for_update(&mut data, now);

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let document = self
            .collection
            .find_one_and_update(
                filter,
                doc! { "$set": data, "$setOnInsert": { "created_at": now } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .ok_or_else(|| AppError::DatabaseError("upsert returned no document".to_string()))?;

        Ok(Self::clean(document))
    }

    /// 문서를 영구 삭제합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(true)` - 문서가 삭제됨
    /// * `Ok(false)` - 해당 id의 문서가 존재하지 않음
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    /// 필터와 일치하는 모든 문서를 영구 삭제합니다.
    ///
    /// # 반환값
    ///
    /// 삭제된 문서 수
    pub async fn delete_many(&self, filter: Document) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    /// 문서를 소프트 삭제합니다.
    ///
    /// `is_deleted`와 `deleted_at` 마킹 필드를 기록할 뿐 문서를 제거하지
    /// 않으며, 이후의 일반 조회에서도 문서가 그대로 반환됩니다.
    /// 삭제된 문서를 숨기려면 호출 측에서 `is_deleted`로 필터링해야 합니다.
    ///
    /// [`update`](Self::update)에 위임하므로 `updated_at`도 함께 갱신됩니다.
    pub async fn soft_delete(&self, id: &str) -> AppResult<Option<Document>> {
        self.update(
            id,
            doc! { "is_deleted": true, "deleted_at": DateTime::now() },
        )
        .await
    }

    /// 집계 파이프라인을 실행합니다.
    ///
    /// 파이프라인 스테이지는 검사 없이 저장소로 전달됩니다.
    /// 결과는 CRUD 읽기와 달리 `_id` 정리를 거치지 않고 그대로 반환되며,
    /// 최대 `limit`개로 제한됩니다 (기본값: [`RepositoryConfig::aggregate_result_limit`]).
    pub async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        limit: Option<usize>,
    ) -> AppResult<Vec<Document>> {
        let cap = limit.unwrap_or_else(RepositoryConfig::aggregate_result_limit);

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            results.push(document);
            if results.len() >= cap {
                break;
            }
        }

        Ok(results)
    }
}
