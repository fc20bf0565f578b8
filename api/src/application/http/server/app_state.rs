use std::sync::Arc;

use mealtally_core::application::MealTallyService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: MealTallyService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: MealTallyService) -> Self {
        Self { args, service }
    }
}
