use axum::extract::{Multipart, State};
use mealtally_core::domain::nutrition::{
    entities::SessionSnapshot, ports::NutritionService, value_objects::SubmitSessionInput,
};

use crate::application::http::{
    nutrition::validators::{SubmissionForm, SubmitSessionForm},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/sessions/submit",
    tag = "nutrition",
    summary = "Submit a meal photo to a typed session",
    description = "Classifies the photo and records it in the session state sent by the client. Totals are kept exactly and the markup is rebuilt from the state.",
    request_body(content = SubmitSessionForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = SessionSnapshot),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse)
    ),
)]
pub async fn submit_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<SessionSnapshot>, ApiError> {
    let mut form = SubmissionForm::read(&mut multipart).await?;
    let image_data = form.take_image()?;
    let prior_state = form.take_session_state()?;

    let snapshot = state
        .service
        .submit_session(SubmitSessionInput {
            image_data,
            prior_state,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(snapshot))
}
