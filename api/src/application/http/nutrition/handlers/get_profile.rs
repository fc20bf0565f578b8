use axum::extract::State;
use mealtally_core::domain::nutrition::value_objects::{
    NutrientKey, NutrientProfile, StateEncoding,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{api_entities::response::Response, app_state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileNutrient {
    pub key: NutrientKey,
    pub label: String,
    pub unit: String,
    pub recommended: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetProfileResponse {
    pub profile: NutrientProfile,
    pub state_encoding: StateEncoding,
    pub nutrients: Vec<ProfileNutrient>,
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "nutrition",
    summary = "Active nutrient profile",
    description = "Lists the tracked nutrients in render order with their recommended daily values.",
    responses(
        (status = 200, body = GetProfileResponse)
    ),
)]
pub async fn get_profile(State(state): State<AppState>) -> Response<GetProfileResponse> {
    let recommended = state.service.recommended();

    let nutrients = recommended
        .profile()
        .keys()
        .map(|key| ProfileNutrient {
            key,
            label: key.label().to_string(),
            unit: key.unit().to_string(),
            recommended: recommended.get(key),
        })
        .collect();

    Response::OK(GetProfileResponse {
        profile: recommended.profile(),
        state_encoding: state.service.state_encoding(),
        nutrients,
    })
}
