use tracing::warn;

use crate::domain::nutrition::{
    entities::{Observation, SessionSnapshot, SessionState, SubmitOutcome, SubmitStatus},
    helpers::accumulate,
    markup::{MarkupZones, read_summary_totals, render_document, render_totals_zones},
    render::render_observation_card,
    value_objects::{NutrientSet, RecommendedDailyValues, StateEncoding},
};

/// What the client sent back from its previous submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorMarkup<'a> {
    Empty,
    Structured {
        markup: &'a str,
        zones: MarkupZones,
    },
    Corrupted(&'a str),
}

impl<'a> PriorMarkup<'a> {
    pub fn inspect(prior_markup: Option<&'a str>) -> Self {
        let Some(markup) = prior_markup.filter(|markup| !markup.trim().is_empty()) else {
            return PriorMarkup::Empty;
        };

        match MarkupZones::locate(markup) {
            Some(zones) => PriorMarkup::Structured { markup, zones },
            None => {
                warn!(
                    markup_len = markup.len(),
                    "prior markup is missing its zone markers, returning it unchanged"
                );
                PriorMarkup::Corrupted(markup)
            }
        }
    }

    pub fn apply(
        &self,
        observation: &Observation,
        recommended: &RecommendedDailyValues,
        encoding: StateEncoding,
    ) -> SubmitOutcome {
        let profile = recommended.profile();

        match *self {
            PriorMarkup::Empty => {
                let totals = accumulate(&NutrientSet::zeroed(profile), &observation.quantities());
                let card = render_observation_card(observation, profile);
                let document = render_document(&card, &totals, recommended, encoding);

                SubmitOutcome::rendered(document, SubmitStatus::Started)
            }
            PriorMarkup::Structured { markup, zones } => {
                let prior_totals = read_summary_totals(zones.summary_zone(markup), recommended);
                let totals = accumulate(&prior_totals, &observation.quantities());
                let card = render_observation_card(observation, profile);
                let next = zones.splice(
                    markup,
                    &card,
                    &render_totals_zones(&totals, recommended, encoding),
                );

                SubmitOutcome::rendered(next, SubmitStatus::Appended)
            }
            PriorMarkup::Corrupted(markup) => SubmitOutcome::unchanged(markup),
        }
    }
}

/// One submission over the markup the client kept from the previous turn.
pub fn on_submit(
    observation: &Observation,
    prior_markup: Option<&str>,
    recommended: &RecommendedDailyValues,
    encoding: StateEncoding,
) -> SubmitOutcome {
    PriorMarkup::inspect(prior_markup).apply(observation, recommended, encoding)
}

/// One submission over a typed session; the markup is rebuilt from the state.
pub fn on_submit_state(
    observation: Observation,
    prior: Option<SessionState>,
    recommended: &RecommendedDailyValues,
    encoding: StateEncoding,
) -> SessionSnapshot {
    let mut state = prior.unwrap_or_else(|| SessionState::new(recommended.profile()));
    state.record(observation);

    let markup = render_state(&state, recommended, encoding);
    SessionSnapshot { state, markup }
}

pub fn render_state(
    state: &SessionState,
    recommended: &RecommendedDailyValues,
    encoding: StateEncoding,
) -> String {
    let cards: String = state
        .observations
        .iter()
        .map(|observation| render_observation_card(observation, state.profile))
        .collect();

    render_document(&cards, &state.totals, recommended, encoding)
}
