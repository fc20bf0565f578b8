use crate::application::http::{health::HealthApiDoc, nutrition::router::NutritionApiDoc};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MealTally API",
        description = "Classifies meal photos and keeps a running daily nutrition tally"
    ),
    nest(
        (path = "/nutrition", api = NutritionApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
