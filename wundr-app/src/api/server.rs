use axum::routing::{delete, get, post};
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::routes::{
    clear_cards, delete_card, grouped_cards, list_cards, resolve, save_card, AppState,
};
use wundr_core::{FlashcardStore, Resolver};

pub async fn run(
    store: Arc<dyn FlashcardStore>,
    resolver: Arc<Resolver>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState { store, resolver });

    let app = Router::new()
        .route("/resolve", post(resolve))
        .route("/cards", post(save_card).get(list_cards).delete(clear_cards))
        .route("/cards/grouped", get(grouped_cards))
        .route("/cards/:id", delete(delete_card))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!(%addr, "wundr api listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
