use serde::{de, Deserialize, Deserializer, Serialize};

use crate::validation::Rejected;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum YesNo {
    #[default]
    #[serde(alias = "yes", alias = "YES")]
    Yes,
    #[serde(alias = "no", alias = "NO")]
    No,
}

impl YesNo {
    pub fn as_flag(self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FurnishingStatus {
    #[default]
    #[serde(alias = "furnished")]
    Furnished,
    #[serde(rename = "Semi-Furnished", alias = "semi-furnished")]
    SemiFurnished,
    #[serde(alias = "unfurnished")]
    Unfurnished,
}

impl FurnishingStatus {
    /// Integer code used by label-encoded models.
    pub fn label_code(self) -> f64 {
        match self {
            FurnishingStatus::Furnished => 0.0,
            FurnishingStatus::SemiFurnished => 1.0,
            FurnishingStatus::Unfurnished => 2.0,
        }
    }
}

/// House attributes submitted from the prediction form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default = "default_area", deserialize_with = "form_count")]
    pub area: u64,
    #[serde(default = "default_bedrooms", deserialize_with = "form_count")]
    pub bedrooms: u64,
    #[serde(default = "default_bathrooms", deserialize_with = "form_count")]
    pub bathrooms: u64,
    #[serde(default = "default_stories", deserialize_with = "form_count")]
    pub stories: u64,
    #[serde(default = "default_parking", deserialize_with = "form_count")]
    pub parking: u64,
    #[serde(default)]
    pub mainroad: YesNo,
    #[serde(default)]
    pub guestroom: YesNo,
    #[serde(default)]
    pub basement: YesNo,
    #[serde(default)]
    pub hotwaterheating: YesNo,
    #[serde(default)]
    pub airconditioning: YesNo,
    #[serde(default)]
    pub prefarea: YesNo,
    #[serde(default)]
    pub furnishingstatus: FurnishingStatus,
    // Display only, never part of the feature row
    #[serde(default)]
    pub location: String,
}

/// What a numeric form field may arrive as.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormNumber {
    Whole(u64),
    Real(f64),
    Text(String),
}

/// Accepts a non-negative whole number, given either as a JSON number or a
/// numeric string. Blank strings and fractions are errors, never 0 or a
/// rounded value.
fn form_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match FormNumber::deserialize(deserializer)? {
        FormNumber::Whole(value) => Ok(value),
        FormNumber::Real(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            Ok(value as u64)
        }
        FormNumber::Real(value) => Err(de::Error::custom(format!(
            "expected a whole number, got {value}"
        ))),
        FormNumber::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(de::Error::custom("a value is required"));
            }
            trimmed.parse::<u64>().map_err(|_| {
                de::Error::custom(format!("expected a whole number, got {trimmed:?}"))
            })
        }
    }
}

fn default_area() -> u64 {
    1500
}

fn default_bedrooms() -> u64 {
    3
}

fn default_bathrooms() -> u64 {
    2
}

fn default_stories() -> u64 {
    2
}

fn default_parking() -> u64 {
    1
}

impl Default for RawInput {
    fn default() -> Self {
        RawInput {
            area: default_area(),
            bedrooms: default_bedrooms(),
            bathrooms: default_bathrooms(),
            stories: default_stories(),
            parking: default_parking(),
            mainroad: YesNo::default(),
            guestroom: YesNo::default(),
            basement: YesNo::default(),
            hotwaterheating: YesNo::default(),
            airconditioning: YesNo::default(),
            prefarea: YesNo::default(),
            furnishingstatus: FurnishingStatus::default(),
            location: String::new(),
        }
    }
}

impl RawInput {
    pub fn validate(&self) -> Result<(), Rejected> {
        check_range("Area (sq ft)", self.area, 100, 10000)?;
        check_range("Number of Bedrooms", self.bedrooms, 1, 10)?;
        check_range("Number of Bathrooms", self.bathrooms, 1, 5)?;
        check_range("Number of Stories", self.stories, 1, 5)?;
        check_range("Parking Spaces", self.parking, 0, 5)?;
        Ok(())
    }

    /// The location shown to the user, falling back to a generic phrase.
    pub fn display_location(&self) -> &str {
        let trimmed = self.location.trim();
        if trimmed.is_empty() {
            "your city"
        } else {
            trimmed
        }
    }
}

fn check_range(label: &str, value: u64, min: u64, max: u64) -> Result<(), Rejected> {
    if value < min || value > max {
        return Err(Rejected(format!(
            "{label} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_values_accept_strings_and_lowercase() {
        let input: RawInput = serde_json::from_value(serde_json::json!({
            "area": "2400",
            "bedrooms": 4,
            "mainroad": "no",
            "furnishingstatus": "semi-furnished",
        }))
        .unwrap();

        assert_eq!(input.area, 2400);
        assert_eq!(input.bedrooms, 4);
        assert_eq!(input.bathrooms, 2);
        assert_eq!(input.mainroad, YesNo::No);
        assert_eq!(input.guestroom, YesNo::Yes);
        assert_eq!(input.furnishingstatus, FurnishingStatus::SemiFurnished);
    }

    fn parse(body: serde_json::Value) -> Result<RawInput, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn blank_count_is_an_error() {
        let err = parse(serde_json::json!({ "parking": "" })).unwrap_err();
        assert!(err.to_string().contains("a value is required"));
        assert!(parse(serde_json::json!({ "parking": "   " })).is_err());
    }

    #[test]
    fn fractional_count_is_not_rounded() {
        let err = parse(serde_json::json!({ "parking": 2.7 })).unwrap_err();
        assert!(err.to_string().contains("whole number"));
        assert!(parse(serde_json::json!({ "parking": "2.7" })).is_err());
        assert!(parse(serde_json::json!({ "area": -5 })).is_err());
    }

    #[test]
    fn whole_float_and_padded_text_are_accepted() {
        let input = parse(serde_json::json!({ "parking": 2.0, "bedrooms": " 4 " })).unwrap();
        assert_eq!(input.parking, 2);
        assert_eq!(input.bedrooms, 4);
    }

    #[test]
    fn out_of_range_area_is_rejected() {
        let input = RawInput {
            area: 50,
            ..RawInput::default()
        };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("Area"));
    }

    #[test]
    fn zero_parking_is_allowed() {
        let input = RawInput {
            parking: 0,
            ..RawInput::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_location_falls_back() {
        let input = RawInput {
            location: "   ".to_string(),
            ..RawInput::default()
        };
        assert_eq!(input.display_location(), "your city");
    }
}
