//! REST server exposing a [`NoteStore`] over HTTP.

mod error;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::AppState;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::Result;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/notes", get(routes::list_notes).post(routes::create_note))
        .route("/notes/search", get(routes::search_notes))
        .route("/notes/suggest-tags", post(routes::suggest_tags))
        .route(
            "/notes/{id}",
            get(routes::get_note)
                .put(routes::update_note)
                .delete(routes::delete_note),
        )
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn serve(listener: TcpListener, state: AppState, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("notesync server listening on http://{}", addr);

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("notesync server stopped");
    Ok(())
}
