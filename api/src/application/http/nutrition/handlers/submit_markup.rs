use axum::extract::{Multipart, State};
use mealtally_core::domain::nutrition::{
    entities::{SubmitOutcome, SubmitStatus},
    ports::NutritionService,
    value_objects::SubmitMarkupInput,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    nutrition::validators::{SubmissionForm, SubmitMarkupForm},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubmitMarkupResponse {
    /// Markup to show right away
    pub display_markup: String,
    /// Markup to send back as `prior_markup` on the next submission
    pub next_state_markup: String,
    pub status: SubmitStatus,
}

impl From<SubmitOutcome> for SubmitMarkupResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            display_markup: outcome.display_markup,
            next_state_markup: outcome.next_state_markup,
            status: outcome.status,
        }
    }
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "nutrition",
    summary = "Submit a meal photo",
    description = "Classifies the photo and appends it to the tally carried by the markup of the previous submission. Markup without its zone markers is returned unchanged with status state_corrupted.",
    request_body(content = SubmitMarkupForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = SubmitMarkupResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse)
    ),
)]
pub async fn submit_markup(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<SubmitMarkupResponse>, ApiError> {
    let mut form = SubmissionForm::read(&mut multipart).await?;
    let image_data = form.take_image()?;

    let outcome = state
        .service
        .submit_markup(SubmitMarkupInput {
            image_data,
            prior_markup: form.prior_markup,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(SubmitMarkupResponse::from(outcome)))
}
