use serde::Serialize;

use crate::models::{
    history::{format_price, HistoryEntry},
    house::RawInput,
};

pub const CSV_FILE_NAME: &str = "prediction_history.csv";

const CSV_HEADER: [&str; 7] = [
    "Location",
    "Area",
    "Bedrooms",
    "Bathrooms",
    "Stories",
    "Parking",
    "Predicted Price",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub area: u64,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn record(&mut self, input: &RawInput, price: f64, currency: &str) -> HistoryEntry {
        let location = input.location.trim();
        let entry = HistoryEntry {
            location: if location.is_empty() {
                "Unknown".to_string()
            } else {
                location.to_string()
            },
            area: input.area,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            stories: input.stories,
            parking: input.parking,
            formatted_price: format_price(currency, price),
            price,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Price against area, in the order the predictions were made.
    pub fn trend(&self) -> Vec<TrendPoint> {
        self.entries
            .iter()
            .map(|entry| TrendPoint {
                area: entry.area,
                price: entry.price,
            })
            .collect()
    }

    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADER.join(",");
        out.push('\n');

        for entry in &self.entries {
            let fields = [
                csv_field(&entry.location),
                entry.area.to_string(),
                entry.bedrooms.to_string(),
                entry.bathrooms.to_string(),
                entry.stories.to_string(),
                entry.parking.to_string(),
                csv_field(&entry.formatted_price),
            ];
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
