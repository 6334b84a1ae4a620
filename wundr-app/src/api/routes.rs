use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use wundr_core::{
    derive_id, normalize_object, normalize_target, CoreError, Flashcard, FlashcardStore,
    ResolveOutcome, ResolveRequest, Resolver, SaveOutcome,
};

use crate::api::dto::{CardOut, GroupOut, ResolveIn, ResolveOut, SaveIn, SaveOut};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FlashcardStore>,
    pub resolver: Arc<Resolver>,
}

fn err_status(e: &CoreError) -> StatusCode {
    match e {
        CoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

pub async fn resolve(
    State(st): State<Arc<AppState>>,
    Json(body): Json<ResolveIn>,
) -> Result<Json<ResolveOut>, StatusCode> {
    let req = ResolveRequest {
        object: body.object,
        target: body.target,
        level: body.level,
        image_uri: body.image_uri,
    };
    match st.resolver.resolve(&req).await.map_err(|e| err_status(&e))? {
        ResolveOutcome::Resolved(r) => Ok(Json(r.into())),
        ResolveOutcome::Superseded => Err(StatusCode::CONFLICT),
    }
}

pub async fn save_card(
    State(st): State<Arc<AppState>>,
    Json(body): Json<SaveIn>,
) -> Result<(StatusCode, Json<SaveOut>), StatusCode> {
    let id = derive_id(&body.target, &body.object, body.level).map_err(|e| err_status(&e))?;
    let card = Flashcard {
        id: id.clone(),
        object: normalize_object(&body.object),
        target: normalize_target(&body.target),
        level: body.level,
        translated: body.translated,
        prompts: body.prompts,
        image_uri: body.image_uri,
        created_at: chrono::Utc::now(),
    };
    match st.resolver.save(&card).await.map_err(|e| err_status(&e))? {
        SaveOutcome::Saved => Ok((StatusCode::CREATED, Json(SaveOut { id, status: "saved" }))),
        SaveOutcome::AlreadySaved => Ok((
            StatusCode::OK,
            Json(SaveOut {
                id,
                status: "already_saved",
            }),
        )),
    }
}

pub async fn list_cards(
    State(st): State<Arc<AppState>>,
) -> Result<Json<Vec<CardOut>>, StatusCode> {
    let mut cards = st.store.list().await.map_err(|e| err_status(&e))?;
    cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(cards.into_iter().map(CardOut::from).collect()))
}

#[derive(Deserialize)]
pub struct GroupedQuery {
    sort_sections: Option<bool>,
}

pub async fn grouped_cards(
    State(st): State<Arc<AppState>>,
    Query(q): Query<GroupedQuery>,
) -> Result<Json<Vec<GroupOut>>, StatusCode> {
    let sections = st
        .store
        .list_grouped_by_target(q.sort_sections.unwrap_or(true))
        .await
        .map_err(|e| err_status(&e))?;
    Ok(Json(
        sections
            .into_iter()
            .map(|(language, cards)| GroupOut {
                language,
                cards: cards.into_iter().map(CardOut::from).collect(),
            })
            .collect(),
    ))
}

pub async fn delete_card(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    st.store.delete(&id).await.map_err(|e| err_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_cards(State(st): State<Arc<AppState>>) -> Result<StatusCode, StatusCode> {
    st.store.clear().await.map_err(|e| err_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
