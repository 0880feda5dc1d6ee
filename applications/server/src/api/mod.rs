/// API route modules
pub mod albums;
pub mod collaborations;
pub mod exports;
pub mod health;
pub mod playlists;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the `/api` router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health::health));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route("/playlists/:id", axum::routing::delete(playlists::delete_playlist))
        .route(
            "/playlists/:id/songs",
            get(playlists::list_songs)
                .post(playlists::add_song)
                .delete(playlists::remove_song),
        )
        .route("/playlists/:id/activities", get(playlists::list_activities))
        // Collaborations
        .route(
            "/collaborations",
            post(collaborations::add_collaborator).delete(collaborations::remove_collaborator),
        )
        // Album likes
        .route(
            "/albums/:id/likes",
            get(albums::likes_count)
                .post(albums::like_album)
                .delete(albums::unlike_album),
        )
        // Exports
        .route("/export/playlists/:id", post(exports::export_playlist))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
