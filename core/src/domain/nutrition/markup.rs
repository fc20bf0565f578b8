//! Layout of the rendered tally document and recovery of totals from it.
//!
//! The document has three zones, each opened by a marker that occurs once:
//! the food cards (closed by [`CARDS_END_MARKER`]), the summary bars and the
//! warning banner. Totals travel inside the summary zone, either as an exact
//! state block or only as the visible percentage labels.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::nutrition::{
    render::{render_summary, render_warning},
    value_objects::{NutrientProfile, NutrientSet, RecommendedDailyValues, StateEncoding},
};

pub const CARDS_END_MARKER: &str = "<!-- meal-cards:end -->";
pub const SUMMARY_ZONE_MARKER: &str = r#"<div id="nutrition-summary">"#;
pub const WARNING_ZONE_MARKER: &str = r#"<div id="nutrition-warning">"#;
pub const PERCENT_LABEL_OPEN: &str = r#"<div style="font-size: 0.9em; text-align: right;">"#;

const STATE_BLOCK_OPEN: &str = "<!-- nutrient-totals:v1 ";
const STATE_BLOCK_CLOSE: &str = " -->";

static PERCENT_LABEL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        "{}([0-9]+)%</div>",
        regex::escape(PERCENT_LABEL_OPEN)
    ))
    .ok()
});

/// Byte offsets of the three zone markers in a well-formed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupZones {
    pub cards_end: usize,
    pub summary_start: usize,
    pub warning_start: usize,
}

impl MarkupZones {
    /// `None` when a marker is missing, repeated or out of order.
    pub fn locate(markup: &str) -> Option<Self> {
        let zones = Self {
            cards_end: find_once(markup, CARDS_END_MARKER)?,
            summary_start: find_once(markup, SUMMARY_ZONE_MARKER)?,
            warning_start: find_once(markup, WARNING_ZONE_MARKER)?,
        };

        (zones.cards_end < zones.summary_start && zones.summary_start < zones.warning_start)
            .then_some(zones)
    }

    pub fn summary_zone<'a>(&self, markup: &'a str) -> &'a str {
        &markup[self.summary_start..self.warning_start]
    }

    /// Inserts `card` after the existing cards and replaces everything from
    /// the summary zone onwards with `zones`.
    pub fn splice(&self, markup: &str, card: &str, zones: &str) -> String {
        let mut next = String::with_capacity(markup.len() + card.len() + zones.len());
        next.push_str(&markup[..self.cards_end]);
        next.push_str(card);
        next.push_str(&markup[self.cards_end..self.summary_start]);
        next.push_str(zones);
        next
    }
}

fn find_once(haystack: &str, needle: &str) -> Option<usize> {
    let mut found = haystack.match_indices(needle).map(|(index, _)| index);
    let first = found.next()?;
    found.next().is_none().then_some(first)
}

pub fn render_document(
    cards: &str,
    totals: &NutrientSet,
    recommended: &RecommendedDailyValues,
    encoding: StateEncoding,
) -> String {
    format!(
        r##"
<div id="today-nutrition" style="margin-bottom: 20px;">
    <h3 style="margin: 0 0 15px 0; font-size: 1.1em;">🍽️ 오늘의 식단</h3>
    <div class="food-cards" style="overflow-x: auto; white-space: nowrap;">{cards}
        {CARDS_END_MARKER}
    </div>
</div>
{zones}"##,
        zones = render_totals_zones(totals, recommended, encoding),
    )
}

/// Summary and warning zones, which are regenerated on every submission.
pub fn render_totals_zones(
    totals: &NutrientSet,
    recommended: &RecommendedDailyValues,
    encoding: StateEncoding,
) -> String {
    let state_block = match encoding {
        StateEncoding::StateBlock => {
            format!(
                "\n    {STATE_BLOCK_OPEN}{}{STATE_BLOCK_CLOSE}",
                tracked(totals, recommended.profile())
            )
        }
        StateEncoding::PercentLabels => String::new(),
    };

    format!(
        "{SUMMARY_ZONE_MARKER}{state_block}{summary}</div>\n{WARNING_ZONE_MARKER}{warning}</div>\n",
        summary = render_summary(totals, recommended),
        warning = render_warning(totals, recommended),
    )
}

fn tracked(totals: &NutrientSet, profile: NutrientProfile) -> NutrientSet {
    profile.keys().map(|key| (key, totals.get(key))).collect()
}

/// Running totals carried by a previously rendered document. Anything that
/// cannot be read back yields all-zero totals.
pub fn deserialize_totals(markup: &str, recommended: &RecommendedDailyValues) -> NutrientSet {
    match MarkupZones::locate(markup) {
        Some(zones) => read_summary_totals(zones.summary_zone(markup), recommended),
        None => NutrientSet::zeroed(recommended.profile()),
    }
}

/// Prefers the exact state block; falls back to the percentage labels.
pub fn read_summary_totals(summary: &str, recommended: &RecommendedDailyValues) -> NutrientSet {
    let profile = recommended.profile();

    if let Some(totals) = read_state_block(summary, profile) {
        return totals;
    }

    match read_percent_labels(summary, recommended) {
        Some(totals) => {
            debug!("recovered totals from percentage labels");
            totals
        }
        None => {
            debug!("no readable totals in summary zone, starting from zero");
            NutrientSet::zeroed(profile)
        }
    }
}

fn read_state_block(summary: &str, profile: NutrientProfile) -> Option<NutrientSet> {
    let start = summary.find(STATE_BLOCK_OPEN)? + STATE_BLOCK_OPEN.len();
    let length = summary[start..].find(STATE_BLOCK_CLOSE)?;

    let totals: NutrientSet = summary[start..start + length].parse().ok()?;
    totals.covers_exactly(profile).then_some(totals)
}

fn read_percent_labels(summary: &str, recommended: &RecommendedDailyValues) -> Option<NutrientSet> {
    let pattern = PERCENT_LABEL_PATTERN.as_ref()?;
    let percents: Vec<f64> = pattern
        .captures_iter(summary)
        .filter_map(|captures| captures.get(1)?.as_str().parse().ok())
        .collect();

    let profile = recommended.profile();
    if percents.len() != profile.key_count() {
        return None;
    }

    Some(
        profile
            .keys()
            .zip(percents)
            .map(|(key, percent)| (key, percent / 100.0 * recommended.get(key)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nutrition::value_objects::NutrientKey;

    fn water_sugar() -> RecommendedDailyValues {
        RecommendedDailyValues::for_profile(NutrientProfile::WaterSugar)
    }

    fn sample_totals() -> NutrientSet {
        NutrientSet::zeroed(NutrientProfile::WaterSugar)
            .with(NutrientKey::Calories, 180.0)
            .with(NutrientKey::Water, 50.0)
            .with(NutrientKey::Protein, 10.0)
            .with(NutrientKey::Fat, 5.0)
            .with(NutrientKey::Carbohydrates, 30.0)
            .with(NutrientKey::Sugar, 8.0)
    }

    #[test]
    fn test_rendered_document_has_each_marker_once_in_order() {
        for encoding in [StateEncoding::StateBlock, StateEncoding::PercentLabels] {
            let document = render_document("", &sample_totals(), &water_sugar(), encoding);
            let zones = MarkupZones::locate(&document);

            assert!(zones.is_some(), "{encoding}");
        }
    }

    #[test]
    fn test_locate_rejects_missing_duplicated_or_reordered_markers() {
        let document = render_document(
            "",
            &sample_totals(),
            &water_sugar(),
            StateEncoding::StateBlock,
        );

        let missing = document.replace(WARNING_ZONE_MARKER, "<div>");
        assert_eq!(MarkupZones::locate(&missing), None);

        let duplicated = format!("{document}{SUMMARY_ZONE_MARKER}");
        assert_eq!(MarkupZones::locate(&duplicated), None);

        let reordered = format!(
            "{WARNING_ZONE_MARKER}</div>{}",
            document.replace(WARNING_ZONE_MARKER, "<div>")
        );
        assert_eq!(MarkupZones::locate(&reordered), None);

        assert_eq!(MarkupZones::locate("<p>hello</p>"), None);
    }

    #[test]
    fn test_state_block_round_trip_is_exact() {
        let totals = sample_totals().with(NutrientKey::Calories, 336.123456789);
        let document = render_document("", &totals, &water_sugar(), StateEncoding::StateBlock);

        assert_eq!(deserialize_totals(&document, &water_sugar()), totals);
    }

    #[test]
    fn test_percent_labels_recover_totals_within_one_percent() {
        let recommended = water_sugar();
        let totals = sample_totals()
            .with(NutrientKey::Sugar, 75.5)
            .with(NutrientKey::Water, 3100.0);

        let recovered = read_summary_totals(&render_summary(&totals, &recommended), &recommended);

        for key in NutrientProfile::WaterSugar.keys() {
            let tolerance = recommended.get(key) / 100.0;
            assert!(
                (recovered.get(key) - totals.get(key)).abs() <= tolerance + 1e-9,
                "{key}: {} vs {}",
                recovered.get(key),
                totals.get(key)
            );
        }
    }

    #[test]
    fn test_percent_labels_lose_the_fraction() {
        let recommended = water_sugar();
        let document = render_document(
            "",
            &sample_totals(),
            &recommended,
            StateEncoding::PercentLabels,
        );

        let recovered = deserialize_totals(&document, &recommended);

        assert!((recovered.get(NutrientKey::Calories) - 156.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_label_count_degrades_to_zero() {
        let recommended = water_sugar();
        let summary = render_summary(&sample_totals(), &recommended);
        let extra_label = format!("{SUMMARY_ZONE_MARKER}{summary}{PERCENT_LABEL_OPEN}5%</div>");

        let recovered = read_summary_totals(&extra_label, &recommended);

        assert_eq!(recovered, NutrientSet::zeroed(NutrientProfile::WaterSugar));
    }

    #[test]
    fn test_malformed_state_block_falls_back_to_labels() {
        let recommended = water_sugar();
        let summary = format!(
            "{STATE_BLOCK_OPEN}calories=abc{STATE_BLOCK_CLOSE}{}",
            render_summary(&sample_totals(), &recommended)
        );

        let recovered = read_summary_totals(&summary, &recommended);

        assert!((recovered.get(NutrientKey::Calories) - 156.0).abs() < 1e-9);
    }

    #[test]
    fn test_state_block_for_other_profile_is_ignored() {
        let fiber_sodium = RecommendedDailyValues::for_profile(NutrientProfile::FiberSodium);
        let document = render_document(
            "",
            &sample_totals(),
            &water_sugar(),
            StateEncoding::StateBlock,
        );

        let recovered = deserialize_totals(&document, &fiber_sodium);

        assert_ne!(recovered.get(NutrientKey::Calories), 180.0);
    }

    #[test]
    fn test_splice_inserts_card_before_end_marker_and_replaces_zones() {
        let recommended = water_sugar();
        let document = render_document(
            "<div>first</div>",
            &sample_totals(),
            &recommended,
            StateEncoding::StateBlock,
        );
        let zones = MarkupZones::locate(&document).unwrap();
        let doubled = sample_totals().with(NutrientKey::Calories, 360.0);
        let new_zones = render_totals_zones(&doubled, &recommended, StateEncoding::StateBlock);

        let next = zones.splice(&document, "<div>second</div>", &new_zones);

        let first = next.find("<div>first</div>").unwrap();
        let second = next.find("<div>second</div>").unwrap();
        let end = next.find(CARDS_END_MARKER).unwrap();
        assert!(first < second && second < end);
        assert!(MarkupZones::locate(&next).is_some());
        assert_eq!(
            deserialize_totals(&next, &recommended).get(NutrientKey::Calories),
            360.0
        );
    }
}
