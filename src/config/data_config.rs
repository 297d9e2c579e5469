//! 데이터 및 환경 설정 관리 모듈
//!
//! 데이터베이스 연결과 리포지토리 조회 한도 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string()))
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 환경 이름 문자열 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// 해당하는 Environment 값. 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// MongoDB 연결 설정
pub struct DatabaseConfig;

impl DatabaseConfig {
    /// MongoDB 연결 URI를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `MONGODB_URI`: 커스텀 연결 URI (기본값: "mongodb://localhost:27017")
    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    /// 사용할 데이터베이스 이름을 반환합니다.
    ///
    /// `DATABASE_NAME` 환경 변수가 없으면 현재 실행 환경에 맞는
    /// 기본 데이터베이스 이름을 사용합니다.
    pub fn database_name() -> String {
        env::var("DATABASE_NAME")
            .unwrap_or_else(|_| Self::database_name_for_env(&Environment::current()).to_string())
    }

    /// 특정 환경에 대한 기본 데이터베이스 이름을 반환합니다.
    pub fn database_name_for_env(env: &Environment) -> &'static str {
        match env {
            Environment::Development => "zion_city_dev",
            Environment::Test => "zion_city_test",
            Environment::Staging => "zion_city_staging",
            Environment::Production => "zion_city",
        }
    }
}

/// 리포지토리 조회 한도 설정
///
/// 페이지네이션과 집계 결과 개수의 기본 상한을 관리합니다.
/// 모든 값은 환경 변수로 재정의할 수 있으며, 허용 범위를 벗어나면 기본값이 사용됩니다.
pub struct RepositoryConfig;

impl RepositoryConfig {
    /// 목록 조회의 기본 문서 개수 상한을 반환합니다.
    ///
    /// # Returns
    ///
    /// 1-1000 범위의 한도 값. 기본값: 100
    ///
    /// # Environment Variables
    ///
    /// - `DEFAULT_LIST_LIMIT`: 커스텀 한도 설정
    pub fn default_list_limit() -> i64 {
        if let Ok(limit_str) = env::var("DEFAULT_LIST_LIMIT") {
            if let Ok(limit) = limit_str.parse::<i64>() {
                if (1..=1000).contains(&limit) {
                    return limit;
                }
            }
        }

        100
    }

    /// 사용자 검색의 기본 문서 개수 상한을 반환합니다.
    ///
    /// # Returns
    ///
    /// 1-100 범위의 한도 값. 기본값: 20
    ///
    /// # Environment Variables
    ///
    /// - `DEFAULT_SEARCH_LIMIT`: 커스텀 한도 설정
    pub fn default_search_limit() -> i64 {
        if let Ok(limit_str) = env::var("DEFAULT_SEARCH_LIMIT") {
            if let Ok(limit) = limit_str.parse::<i64>() {
                if (1..=100).contains(&limit) {
                    return limit;
                }
            }
        }

        20
    }

    /// 집계 파이프라인 결과의 기본 개수 상한을 반환합니다.
    ///
    /// # Returns
    ///
    /// 1-10000 범위의 한도 값. 기본값: 100
    ///
    /// # Environment Variables
    ///
    /// - `AGGREGATE_RESULT_LIMIT`: 커스텀 한도 설정
    pub fn aggregate_result_limit() -> usize {
        if let Ok(limit_str) = env::var("AGGREGATE_RESULT_LIMIT") {
            if let Ok(limit) = limit_str.parse::<usize>() {
                if (1..=10_000).contains(&limit) {
                    return limit;
                }
            }
        }

        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(
            Environment::from_str("development"),
            Environment::Development
        );
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_database_name_for_each_environment() {
        assert_eq!(
            DatabaseConfig::database_name_for_env(&Environment::Development),
            "zion_city_dev"
        );
        assert_eq!(
            DatabaseConfig::database_name_for_env(&Environment::Test),
            "zion_city_test"
        );
        assert_eq!(
            DatabaseConfig::database_name_for_env(&Environment::Staging),
            "zion_city_staging"
        );
        assert_eq!(
            DatabaseConfig::database_name_for_env(&Environment::Production),
            "zion_city"
        );
    }

    #[test]
    fn test_repository_config_defaults() {
        if env::var("DEFAULT_LIST_LIMIT").is_err() {
            assert_eq!(RepositoryConfig::default_list_limit(), 100);
        }

        if env::var("DEFAULT_SEARCH_LIMIT").is_err() {
            assert_eq!(RepositoryConfig::default_search_limit(), 20);
        }

        if env::var("AGGREGATE_RESULT_LIMIT").is_err() {
            assert_eq!(RepositoryConfig::aggregate_result_limit(), 100);
        }
    }
}
