// src/main.rs

use std::process::ExitCode;
use std::time::Duration;

use dotenvy::dotenv;
use quiz_engine::config::Config;
use quiz_engine::error::AppError;
use quiz_engine::services::study;
use quiz_engine::store::{CourseStore, PgStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if present)
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "quiz-report.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging). Stdout is reserved for the report itself.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(course_id) = args.next() else {
        eprintln!("usage: quiz-report <course-id> [recent-limit]");
        return ExitCode::from(2);
    };
    let limit = match args.next().map(|raw| raw.parse::<usize>()) {
        None => config.recent_activity_limit,
        Some(Ok(limit)) => limit,
        Some(Err(_)) => {
            eprintln!("recent-limit must be a non-negative integer");
            return ExitCode::from(2);
        }
    };

    match run(&config, &course_id, limit).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Report failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, course_id: &str, limit: usize) -> Result<String, AppError> {
    let pool = connect_with_retry(config).await?;

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    let store = PgStore::new(pool);

    let course = store
        .load_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("course {} not found", course_id)))?;

    let aggregator = study::load_analytics(&store, &course).await?;
    let report = aggregator.report(course.id.clone(), limit);

    Ok(serde_json::to_string_pretty(&report)?)
}

// Initialize Database Pool with Retry
async fn connect_with_retry(config: &Config) -> Result<PgPool, AppError> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Database connected...");
                return Ok(pool);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > MAX_CONNECT_RETRIES {
                    return Err(AppError::StoreError(format!(
                        "failed to connect to database after {} retries: {}",
                        MAX_CONNECT_RETRIES, e
                    )));
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
