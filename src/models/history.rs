use serde::Serialize;

/// A successful prediction, kept for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Area")]
    pub area: u64,
    #[serde(rename = "Bedrooms")]
    pub bedrooms: u64,
    #[serde(rename = "Bathrooms")]
    pub bathrooms: u64,
    #[serde(rename = "Stories")]
    pub stories: u64,
    #[serde(rename = "Parking")]
    pub parking: u64,
    #[serde(rename = "Predicted Price")]
    pub formatted_price: String,
    #[serde(skip)]
    pub price: f64,
}

/// Renders a price rounded to whole units with comma thousands separators,
/// e.g. `₨ 4,550,000`.
pub fn format_price(currency: &str, price: f64) -> String {
    let rounded = price.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("{currency} -{grouped}")
    } else {
        format!("{currency} {grouped}")
    }
}
