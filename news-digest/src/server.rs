use crate::command::{handle_command, CommandRequest, CommandResponse};
use crate::pipeline::NewsPipeline;
use crate::types::Result;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub fn router(pipeline: Arc<NewsPipeline>) -> Router {
    Router::new()
        .route("/news", post(news_handler))
        .route("/health", get(health_handler))
        .with_state(pipeline)
}

/// `POST /news`: always 200, success or failure is in the body
pub async fn news_handler(
    State(pipeline): State<Arc<NewsPipeline>>,
    Json(request): Json<CommandRequest>,
) -> Json<CommandResponse> {
    Json(handle_command(&pipeline, &request.command).await)
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn serve(pipeline: Arc<NewsPipeline>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}
