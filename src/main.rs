//! ZION.CITY 데이터 코어 부트스트랩
//!
//! 환경 설정을 로드하고 MongoDB 연결을 검증한 뒤,
//! 리포지토리 초기화(인덱스 생성)를 수행합니다.
//! HTTP 계층은 이 크레이트를 라이브러리로 소비하는 상위 서비스가 담당합니다.

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use zion_city_backend::db::Database;
use zion_city_backend::repositories::Repository;
use zion_city_backend::repositories::users::UserRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 로깅 및 환경 설정 초기화
    init_logging();
    load_env_file();

    info!(
        "🚀 ZION.CITY 데이터 코어 시작중... ({})",
        chrono::Utc::now().to_rfc3339()
    );

    // 데이터 스토어 초기화
    let database = Database::new().await?;

    // 리포지토리 초기화 (인덱스 생성)
    let user_repository = UserRepository::new(&database);
    user_repository.init().await?;
    info!(
        "✅ '{}' 리포지토리 초기화 완료 - collection: {}",
        user_repository.name(),
        user_repository.collection_name()
    );

    let user_count = user_repository.base().count(None).await?;
    info!("👥 등록된 사용자 수: {}", user_count);

    info!("✅ 데이터 코어가 준비되었습니다");

    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
/// 개발환경과 운영환경을 구분하여 설정을 관리합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// # Examples
///
/// ```bash
/// # 개발 환경
/// PROFILE=dev cargo run
///
/// # 운영 환경
/// PROFILE=prod cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            // 기본 .env 파일 로드
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, mongodb 드라이버는 warn 레벨로 설정됩니다.
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,mongodb=warn")
///
/// # Examples
///
/// ```bash
/// # 전체 debug 모드
/// RUST_LOG=debug cargo run
///
/// # 특정 모듈만 debug
/// RUST_LOG=zion_city_backend::repositories=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,mongodb=warn"));
}
