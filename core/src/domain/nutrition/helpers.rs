use std::sync::LazyLock;

use regex::Regex;

use crate::domain::nutrition::value_objects::{
    IntakePercent, NutrientSet, NutrientValue, RecommendedDailyValues,
};

static DECIMAL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d*)?").ok());

static DIGIT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d$").ok());

/// Reads a quantity out of a loosely formatted value: `"180kcal"` gives 180.0,
/// `"3.5g"` gives 3.5. Numbers pass through; anything without digits is 0.0.
pub fn extract_number<V: Into<NutrientValue>>(value: V) -> f64 {
    match value.into() {
        NutrientValue::Number(number) => number.as_f64().unwrap_or(0.0),
        NutrientValue::Text(text) => first_decimal(&text),
    }
}

fn first_decimal(text: &str) -> f64 {
    DECIMAL_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.find(text))
        .and_then(|found| {
            found
                .as_str()
                .chars()
                .map(|c| if c == '.' { Some(c) } else { ascii_digit(c) })
                .collect::<Option<String>>()
        })
        .and_then(|decimal| decimal.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0; 4];
    DIGIT_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(c.encode_utf8(&mut buf)))
}

/// Decimal digits of every script come in contiguous runs of ten starting at
/// zero, so a digit's value is its distance from the start of its run.
fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }

    let mut offset = 0;
    let mut code = c as u32;
    while let Some(previous) = code.checked_sub(1).and_then(char::from_u32)
        && is_decimal_digit(previous)
    {
        offset += 1;
        code -= 1;
    }

    char::from_digit(offset % 10, 10)
}

/// Element-wise sum; keys present in either side appear in the result.
pub fn accumulate(prior: &NutrientSet, new: &NutrientSet) -> NutrientSet {
    let mut totals = prior.clone();
    for (key, value) in new.iter() {
        totals.set(key, prior.get(key) + value);
    }
    totals
}

/// Totals against targets, in the profile's render order.
pub fn intake_percentages(
    totals: &NutrientSet,
    recommended: &RecommendedDailyValues,
) -> Vec<IntakePercent> {
    recommended
        .profile()
        .keys()
        .map(|key| IntakePercent::new(key, totals.get(key), recommended.get(key)))
        .collect()
}
