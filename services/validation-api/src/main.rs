use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use rdkafka::producer::FutureProducer;
use rdkafka::ClientConfig;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shared::config::Settings;
use shared::dto::ValidateRequest;
use shared::error::AppError;
use shared::retry::RetryConfig;

mod report;
mod search;
mod validator;

use report::{GapReporter, KafkaNotifier, PgReportStore, ReportStore};
use search::PgVocabularySearch;
use validator::BatchValidator;

type AppValidator = BatchValidator<PgVocabularySearch, PgReportStore, KafkaNotifier>;

#[derive(Clone)]
struct AppState {
    validator: Arc<AppValidator>,
    reports: Arc<PgReportStore>,
}

async fn health() -> impl Responder {
    "OK"
}

async fn validate(data: web::Data<AppState>, req: web::Json<ValidateRequest>) -> impl Responder {
    match data.validator.validate(&req.ingredients).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(AppError::InvalidRequest(msg)) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
        }
        Err(e) => {
            error!(%e, "batch validation failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Default, Deserialize)]
struct ReportQuery {
    prefix: Option<String>,
    limit: Option<i64>,
}

async fn list_reports(data: web::Data<AppState>, query: web::Query<ReportQuery>) -> impl Responder {
    let prefix = query.prefix.clone().unwrap_or_default();
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    match data.reports.summaries_by_prefix(&prefix, limit).await {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => {
            error!(%e, "failed to load gap reports");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::new()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &settings.message_broker_url)
        .create()?;
    if let Err(e) = shared::kafka::ensure_topics(
        &settings.message_broker_url,
        &[settings.curator_topic.as_str()],
    )
    .await
    {
        warn!(%e, "could not ensure curator topic, continuing");
    }

    let search = Arc::new(PgVocabularySearch::new(
        pool.clone(),
        settings.search_limit,
        settings.fuzzy_floor,
    ));
    let reports = Arc::new(PgReportStore::new(pool.clone()));
    let notifier = Arc::new(KafkaNotifier::new(producer, settings.curator_topic.clone()));
    let reporter = GapReporter::new(
        reports.clone(),
        notifier,
        settings.review_threshold,
        RetryConfig::default(),
    );
    let state = AppState {
        validator: Arc::new(BatchValidator::new(search, reporter)),
        reports,
    };

    info!(
        "validation-api listening on {}:{}",
        settings.bind_addr, settings.port
    );
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .route("/health", web::get().to(health))
            .route("/ingredients/validate", web::post().to(validate))
            .route("/reports", web::get().to(list_reports))
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await?;
    Ok(())
}
