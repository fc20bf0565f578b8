use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::nutrition::{
    entities::Observation,
    helpers::accumulate,
    value_objects::{NutrientProfile, NutrientSet},
};

/// Running tally of one session, carried by the client between submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionState {
    pub profile: NutrientProfile,
    pub observations: Vec<Observation>,
    pub totals: NutrientSet,
}

impl SessionState {
    pub fn new(profile: NutrientProfile) -> Self {
        Self {
            profile,
            observations: Vec::new(),
            totals: NutrientSet::zeroed(profile),
        }
    }

    pub fn record(&mut self, observation: Observation) {
        self.totals = accumulate(&self.totals, &observation.quantities());
        self.observations.push(observation);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub markup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    /// No usable prior markup; totals started from zero.
    Started,
    Appended,
    /// Prior markup lacked its zone markers and was returned untouched.
    StateCorrupted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmitOutcome {
    pub display_markup: String,
    pub next_state_markup: String,
    pub status: SubmitStatus,
}

impl SubmitOutcome {
    pub fn rendered(markup: String, status: SubmitStatus) -> Self {
        Self {
            display_markup: markup.clone(),
            next_state_markup: markup,
            status,
        }
    }

    pub fn unchanged(prior_markup: &str) -> Self {
        Self::rendered(prior_markup.to_string(), SubmitStatus::StateCorrupted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::nutrition::value_objects::{NutrientKey, NutrientValue};

    #[test]
    fn test_new_session_starts_at_zero_for_every_tracked_nutrient() {
        let state = SessionState::new(NutrientProfile::FiberSodium);

        assert!(state.observations.is_empty());
        assert!(state.totals.covers_exactly(NutrientProfile::FiberSodium));
        assert!(state.totals.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn test_record_accumulates_exact_totals() {
        let mut state = SessionState::new(NutrientProfile::WaterSugar);
        let nutrients: BTreeMap<NutrientKey, NutrientValue> =
            [(NutrientKey::Calories, NutrientValue::from("180kcal"))].into();

        state.record(Observation::new("밥", 90.0, nutrients.clone()));
        state.record(Observation::new("밥", 90.0, nutrients));

        assert_eq!(state.observations.len(), 2);
        assert_eq!(state.totals.get(NutrientKey::Calories), 360.0);
        assert_eq!(state.totals.get(NutrientKey::Water), 0.0);
    }

    #[test]
    fn test_session_state_json_round_trip() {
        let mut state = SessionState::new(NutrientProfile::WaterSugar);
        state.record(Observation::new(
            "김치",
            71.0,
            [(NutrientKey::Sugar, NutrientValue::from(2.5))].into(),
        ));

        let json = serde_json::to_string(&state).unwrap();
        let decoded: SessionState = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, state);
        assert!(json.contains("\"profile\":\"water-sugar\""));
    }
}
