//! Category API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // static segments take priority over /{id}
        .route("/roots", get(handler::roots))
        .route("/search", get(handler::search))
        .route("/slug/{slug}", get(handler::get_by_slug))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/children", get(handler::children))
        .route("/{id}/descendants", get(handler::descendants))
        .route("/{id}/ancestors", get(handler::ancestors))
        .route("/{id}/breadcrumb", get(handler::breadcrumb))
        .route("/{id}/products", get(handler::products))
}
