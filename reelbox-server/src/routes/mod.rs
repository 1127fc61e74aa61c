use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    media::video_handlers,
    users::{auth, user_handlers, watch_history_handlers},
};

/// Welcome banner on the bare root.
async fn welcome() -> &'static str {
    "Welcome to the Local Video Streaming Backend"
}

/// Assemble the full application router: API under `/api`, raw video files
/// under `/videos` (range requests handled by the static file service).
pub fn create_router(state: AppState) -> Router {
    let media_root = state.config.media_root.clone();

    Router::new()
        .route("/", get(welcome))
        .nest("/api", api_routes(state.clone()))
        .nest_service("/videos", ServeDir::new(media_root))
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route("/users/signup", post(auth::handlers::signup))
        .route("/users/login", post(auth::handlers::login))
        // Public catalog endpoints
        .route("/videos", get(video_handlers::list_videos_handler))
        .route("/videos/{id}", get(video_handlers::get_video_handler))
        .route("/videos/{id}", put(video_handlers::update_video_handler))
        // Merge protected routes
        .merge(protected_routes(state.clone()))
        // Merge admin routes
        .merge(admin_routes(state))
}

/// Routes that require a valid bearer token.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/profile", put(user_handlers::update_profile_handler))
        .route(
            "/users/last-viewed",
            get(watch_history_handlers::last_viewed_handler),
        )
        .route(
            "/users/watch-history",
            post(watch_history_handlers::update_watch_history_handler),
        )
        .route(
            "/users/watch-history/{video_id}",
            get(watch_history_handlers::watch_history_by_video_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}

/// Routes that additionally require the admin flag.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(user_handlers::list_users_handler))
        .route(
            "/videos/refresh",
            post(video_handlers::refresh_library_handler),
        )
        .route_layer(middleware::from_fn(auth::middleware::admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::auth_middleware,
        ))
}
