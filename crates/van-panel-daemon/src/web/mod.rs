//! Web touch surface and JSON API.
//!
//! A kiosk browser opens `/`, which shows `/screen.png` full screen and posts
//! pointer coordinates to `/touch`.

use askama::Template;
use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::navigation::Screen;
use crate::panel::TouchOutcome;
use crate::state::AppState;

/// Full-screen touch page.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    width: u32,
    height: u32,
}

/// Creates the web router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Touch surface
        .route("/", get(index))
        .route("/screen.png", get(screen_png))
        .route("/touch", post(touch))
        // JSON API
        .route("/api/accessories", get(accessories))
        .route("/api/accessories/:index/toggle", post(toggle_accessory))
        .route("/api/screen", get(screen_get))
        .route("/api/screen/:name", post(screen_set))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// GET / - Touch page
async fn index(State(state): State<Arc<AppState>>) -> Response {
    let (width, height) = state.dimensions();
    render(IndexTemplate { width, height })
}

/// GET /screen.png - Current screen as PNG
async fn screen_png(State(state): State<Arc<AppState>>) -> Response {
    match state.get_screen_png() {
        Ok(png_data) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            png_data,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate PNG: {}", e),
        )
            .into_response(),
    }
}

/// Form data for a touch, in display pixels.
#[derive(Deserialize)]
struct TouchForm {
    x: f32,
    y: f32,
}

/// POST /touch - Hit-test a touch and respond with the visible screen
async fn touch(State(state): State<Arc<AppState>>, Form(form): Form<TouchForm>) -> String {
    if let Some(TouchOutcome::Toggled { index, on }) = state.touch(form.x, form.y) {
        debug!("Touch toggled accessory {} to {}", index, on);
    }
    state.screen().to_string()
}

/// GET /api/accessories - Every accessory and its state
async fn accessories(State(state): State<Arc<AppState>>) -> Response {
    Json(state.accessories()).into_response()
}

/// POST /api/accessories/:index/toggle - Toggle one accessory
async fn toggle_accessory(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Response {
    match state.toggle(index) {
        Ok(status) => Json(status).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

/// GET /api/screen - Visible screen
async fn screen_get(State(state): State<Arc<AppState>>) -> Response {
    Json(json!({ "screen": state.screen().to_string() })).into_response()
}

/// POST /api/screen/:name - Show a screen
async fn screen_set(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    match name.parse::<Screen>() {
        Ok(screen) => {
            state.set_screen(screen);
            Json(json!({ "screen": screen.to_string() })).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
