//! HTTP 接口（axum）
//!
//! | 方法 | 路径 | 说明 |
//! |------|------|------|
//! | GET  | `/api/encryption/publickey`（别名 `/getkey`） | 当前公钥 |
//! | POST | `/api/encryption/decrypt` | 解密 `{ data }` |
//! | GET  | `/api/encryption/debugkeys` | 开发模式导出密钥对 |
//! | GET  | `/health` | 健康检查 |

use crate::asymmetric::RsaOaepSystem;
use crate::common::config::{ConfigFile, ServerConfig};
use crate::contract::{
    DebugKeyBundle, DecryptRequest, DecryptResponse, HealthResponse, PublicKeyBundle,
};
use crate::error::{Error, ErrorKind};
use crate::rotation::manager::KeyManager;
use crate::server::gateway::EncryptionGateway;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Gateway(e) => match e.kind() {
                ErrorKind::Format => (StatusCode::INTERNAL_SERVER_ERROR, "FORMAT_ERROR", e.to_string()),
                ErrorKind::Argument => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "ARGUMENT_ERROR", e.to_string())
                }
                ErrorKind::Authorization => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string()),
                ErrorKind::Decrypt => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DECRYPTION_ERROR",
                    "decryption failed".to_string(),
                ),
                ErrorKind::Generation => {
                    tracing::error!(error = %e, "key generation failed while serving request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "KEY_GENERATION_ERROR",
                        "key generation failed".to_string(),
                    )
                }
                ErrorKind::Configuration | ErrorKind::Internal => {
                    tracing::error!(error = %e, "internal error while serving request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "internal error".to_string(),
                    )
                }
            },
            ApiError::Worker(e) => {
                tracing::error!(error = %e, "blocking worker failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// 所有处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub gateway: EncryptionGateway,
    pub version: String,
}

impl AppState {
    pub fn new(gateway: EncryptionGateway) -> Self {
        Self {
            gateway,
            version: crate::VERSION.to_string(),
        }
    }

    /// 校验配置并生成第一个密钥对。
    pub async fn from_config(config: &ConfigFile) -> Result<Self, Error> {
        config.validate()?;
        let crypto = config.crypto.clone();
        let policy = config.rotation.clone();
        let manager =
            tokio::task::spawn_blocking(move || KeyManager::<RsaOaepSystem>::new(crypto, policy))
                .await
                .map_err(worker_failure)??;
        Ok(Self::new(EncryptionGateway::new(
            Arc::new(manager),
            config.server.mode,
        )))
    }
}

fn worker_failure(e: tokio::task::JoinError) -> Error {
    Error::Internal(format!("key manager start-up task failed: {e}"))
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/encryption/publickey", get(get_public_key))
        .route("/api/encryption/getkey", get(get_public_key))
        .route("/api/encryption/decrypt", post(decrypt))
        .route("/api/encryption/debugkeys", get(debug_keys))
        .with_state(state)
}

/// 路由加上中间件
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let mut router = create_router(state).layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    router
}

async fn get_public_key(State(state): State<AppState>) -> ApiResult<Json<PublicKeyBundle>> {
    let gateway = state.gateway.clone();
    let bundle = tokio::task::spawn_blocking(move || gateway.public_key()).await??;
    Ok(Json(bundle))
}

async fn decrypt(
    State(state): State<AppState>,
    request: Result<Json<DecryptRequest>, JsonRejection>,
) -> ApiResult<Json<DecryptResponse>> {
    let Json(request) = request.map_err(|rejection| Error::FormatError(rejection.body_text()))?;
    let gateway = state.gateway.clone();
    let decrypted_data =
        tokio::task::spawn_blocking(move || gateway.decrypt_optional(request.data.as_deref()))
            .await??;
    Ok(Json(DecryptResponse { decrypted_data }))
}

async fn debug_keys(State(state): State<AppState>) -> ApiResult<Json<DebugKeyBundle>> {
    let gateway = state.gateway.clone();
    let keys = tokio::task::spawn_blocking(move || gateway.debug_keys()).await??;
    Ok(Json(keys))
}

/// Health check endpoint. 只读，不会触发轮换。
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let manager = state.gateway.key_manager();
    let snapshot = manager.snapshot();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        key_id: snapshot.id().to_string(),
        key_expired: manager.is_stale(&snapshot),
    })
}

/// Run the API server until Ctrl+C.
pub async fn run_server(config: ConfigFile) -> Result<(), Error> {
    let state = AppState::from_config(&config).await?;
    let router = build_app(state, &config.server);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        mode = %config.server.mode,
        "seal-gate listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("seal-gate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
