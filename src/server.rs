use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::WoundCategory;
use crate::cli::ServeArgs;
use crate::hospital::HospitalId;
use crate::index::PriceBook;
use crate::report;

#[derive(Clone)]
struct AppState {
    book: Arc<PriceBook>,
}

pub async fn run(opts: ServeArgs) -> anyhow::Result<()> {
    let book = PriceBook::load(&opts.data.storage_paths());
    for hospital in HospitalId::ALL {
        tracing::info!(
            "{} ({}): {} procedures",
            hospital.display_name(),
            hospital.location(),
            book.procedures_loaded(hospital)
        );
    }

    let app = router(Arc::new(book));

    let addr: SocketAddr = format!("{}:{}", opts.host, opts.port)
        .parse()
        .context("parse host:port")?;

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(book: Arc<PriceBook>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pricing", get(api_pricing))
        .route("/api/pricing/compare", get(api_compare))
        .route("/api/wound-types", get(api_wound_types))
        .route("/health", get(api_health))
        .layer(cors)
        .with_state(AppState { book })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(e: impl ToString) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn parse_wound(raw: Option<&str>) -> Result<WoundCategory, Response> {
    WoundCategory::from_label_lenient(raw.unwrap_or("")).map_err(not_found)
}

fn parse_hospital(raw: Option<&str>, default: HospitalId) -> Result<HospitalId, Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(not_found),
        None => Ok(default),
    }
}

#[derive(Debug, Deserialize)]
struct PricingParams {
    wound_type: Option<String>,
    hospital: Option<String>,
}

async fn api_pricing(
    State(st): State<AppState>,
    Query(p): Query<PricingParams>,
) -> impl IntoResponse {
    let wound = match parse_wound(p.wound_type.as_deref()) {
        Ok(w) => w,
        Err(resp) => return resp,
    };
    let hospital = match parse_hospital(p.hospital.as_deref(), HospitalId::BarnesJewish) {
        Ok(h) => h,
        Err(resp) => return resp,
    };
    Json(report::pricing(&st.book, hospital, wound)).into_response()
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    wound_type: Option<String>,
    a: Option<String>,
    b: Option<String>,
}

async fn api_compare(
    State(st): State<AppState>,
    Query(p): Query<CompareParams>,
) -> impl IntoResponse {
    let wound = match parse_wound(p.wound_type.as_deref()) {
        Ok(w) => w,
        Err(resp) => return resp,
    };
    let (a, b) = match (
        parse_hospital(p.a.as_deref(), HospitalId::BarnesJewish),
        parse_hospital(p.b.as_deref(), HospitalId::Lincoln),
    ) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    Json(report::comparison(&st.book, wound, a, b)).into_response()
}

async fn api_wound_types() -> impl IntoResponse {
    Json(report::wound_types())
}

async fn api_health(State(st): State<AppState>) -> impl IntoResponse {
    Json(report::health(&st.book))
}
