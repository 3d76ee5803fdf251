use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Credentials, KeywordRecommendRequest, RecommendRequest};
use crate::recommend::{filter_recommend, keyword_recommend, now_iso};
use crate::AppState;

pub const ENDPOINTS: [(&str, &str); 6] = [
    ("signup", "POST /signup"),
    ("login", "POST /login"),
    ("books", "GET /books"),
    ("recommend", "POST /recommend"),
    ("aiRecommend", "POST /ai-recommend"),
    ("users", "GET /users"),
];

/// Register every route plus the JSON body config on an `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(health))
        .route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/books", web::get().to(get_all_books))
        .route("/recommend", web::post().to(recommend))
        .route("/ai-recommend", web::post().to(ai_recommend))
        .route("/users", web::get().to(get_all_users));
}

/// Bodies that fail to parse answer with the usual `{success: false, message}` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::MalformedPayload(err.to_string()).into())
}

async fn signup(
    payload: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let credentials = payload.into_inner();
    let response = web::block(move || state.auth.signup(&credentials)).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn login(
    payload: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let credentials = payload.into_inner();
    let response = web::block(move || state.auth.login(&credentials)).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn get_all_books(state: web::Data<AppState>) -> HttpResponse {
    info!("Books list requested");
    HttpResponse::Ok().json(state.catalog.books())
}

// Debug only: stored records are returned verbatim.
async fn get_all_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    info!("Users list requested");
    let users = web::block(move || state.auth.store().load_all()).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn recommend(
    payload: web::Json<RecommendRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    HttpResponse::Ok().json(filter_recommend(&state.catalog, payload.into_inner()))
}

async fn ai_recommend(
    payload: web::Json<KeywordRecommendRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    HttpResponse::Ok().json(keyword_recommend(&state.catalog, payload.into_inner()))
}

async fn health() -> HttpResponse {
    debug!("Health check");
    let endpoints: serde_json::Map<String, serde_json::Value> = ENDPOINTS
        .iter()
        .map(|(name, route)| (name.to_string(), json!(route)))
        .collect();

    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Bookstore API is running successfully!",
        "timestamp": now_iso(),
        "endpoints": endpoints,
    }))
}
