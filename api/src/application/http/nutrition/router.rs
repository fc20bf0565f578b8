use super::handlers::{
    demo_page::demo_page,
    get_profile::{__path_get_profile, get_profile},
    submit_markup::{__path_submit_markup, submit_markup},
    submit_session::{__path_submit_session, submit_session},
};
use super::validators::MAX_SUBMISSION_SIZE;
use crate::application::http::server::app_state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(submit_markup, submit_session, get_profile))]
pub struct NutritionApiDoc;

pub fn nutrition_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/", state.args.server.root_path),
            get(demo_page),
        )
        .route(
            &format!("{}/nutrition/submit", state.args.server.root_path),
            post(submit_markup),
        )
        .route(
            &format!("{}/nutrition/sessions/submit", state.args.server.root_path),
            post(submit_session),
        )
        .route(
            &format!("{}/nutrition/profile", state.args.server.root_path),
            get(get_profile),
        )
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_SIZE))
}
