use html_escape::encode_text;

use crate::domain::nutrition::{
    entities::Observation,
    helpers::intake_percentages,
    markup::PERCENT_LABEL_OPEN,
    value_objects::{NutrientProfile, NutrientSet, RecommendedDailyValues},
};

pub const UNKNOWN_FOOD_PLACEHOLDER: &str = "알 수 없음";
pub const MISSING_VALUE_PLACEHOLDER: &str = "정보 없음";

pub fn render_observation_card(observation: &Observation, profile: NutrientProfile) -> String {
    let food_name = match observation.food_name.trim() {
        "" => UNKNOWN_FOOD_PLACEHOLDER,
        name => name,
    };
    let consumed_at = observation.observed_at.format("%Y-%m-%d %H:%M");

    let nutrient_cells: String = profile
        .keys()
        .map(|key| {
            let value = observation
                .display_value(key)
                .map(|value| value.to_string())
                .unwrap_or_else(|| MISSING_VALUE_PLACEHOLDER.to_string());

            format!(
                r##"
                <div style="text-align: center;">
                    <div style="font-size: 0.8em; color: #666;">{label}</div>
                    <div style="font-size: 0.95em; font-weight: bold;">{value}</div>
                </div>"##,
                label = key.label(),
                value = encode_text(&value),
            )
        })
        .collect();

    format!(
        r##"
        <div class="food-card" data-observation-id="{id}" style="display: inline-block; min-width: 260px; margin: 0 10px 10px 0; padding: 15px; border: 1px solid #e0e0e0; border-radius: 10px; background-color: #ffffff; vertical-align: top;">
            <div style="display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 5px;">
                <div style="font-size: 1.1em; font-weight: bold;">{food_name}</div>
                <div style="font-size: 0.9em; color: #666;">신뢰도: {confidence:.1}%</div>
            </div>
            <div style="font-size: 0.85em; color: #888; margin-bottom: 10px;">섭취 시간: {consumed_at}</div>
            <div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;">{nutrient_cells}
            </div>
        </div>
"##,
        id = observation.id,
        food_name = encode_text(food_name),
        confidence = observation.confidence,
    )
}

/// One bar per tracked nutrient. Bars are not capped at 100%.
pub fn render_summary(totals: &NutrientSet, recommended: &RecommendedDailyValues) -> String {
    let rows: String = intake_percentages(totals, recommended)
        .iter()
        .map(|intake| {
            format!(
                r##"
            <div style="font-size: 0.9em; color: #666;">{label}</div>
            <div style="width: 100%; height: 24px; background-color: #f0f0f0; border-radius: 12px; overflow: hidden;">
                <div style="width: {width}%; height: 100%; background-color: {color}; transition: width 0.3s ease;"></div>
            </div>
            {label_open}{percent}%</div>"##,
                label = intake.key.label(),
                width = intake.percent,
                color = intake.key.bar_color(),
                label_open = PERCENT_LABEL_OPEN,
                percent = intake.label_percent(),
            )
        })
        .collect();

    format!(
        r##"
    <div style="padding: 15px; border: 1px solid #e0e0e0; border-radius: 10px; background-color: #fafafa;">
        <h3 style="margin: 0 0 15px 0; font-size: 1.1em;">📊 하루 권장 영양성분 총계</h3>
        <div style="display: grid; grid-template-columns: 1fr 3fr 1fr; gap: 10px; align-items: center;">{rows}
        </div>
    </div>
"##
    )
}

/// Empty unless at least one total is strictly above its target.
pub fn render_warning(totals: &NutrientSet, recommended: &RecommendedDailyValues) -> String {
    let exceeded: Vec<String> = intake_percentages(totals, recommended)
        .iter()
        .filter(|intake| intake.is_exceeded())
        .map(|intake| format!("{}({}%)", intake.key.label(), intake.label_percent()))
        .collect();

    if exceeded.is_empty() {
        return String::new();
    }

    format!(
        r##"
    <div style="margin-top: 15px; padding: 15px; border: 1px solid #FFB74D; border-radius: 10px; background-color: #FFF3E0;">
        <h3 style="margin: 0 0 10px 0; font-size: 1.1em; color: #F57C00;">⚠️ 섭취량 경고</h3>
        <div style="color: #E65100;">{items} 항목에서 권장섭취량을 초과했습니다.</div>
    </div>
"##,
        items = exceeded.join(", "),
    )
}
