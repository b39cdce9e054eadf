//! Appointment data submitted for a no-show prediction

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A single appointment to score.
///
/// Field names match the column names the model was trained on, so the JSON
/// keys are kept verbatim (including the dataset's own spellings). Each field
/// accepts a JSON integer, a whole-valued float (`29.0`) or a numeric string
/// (`"29"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// 0 = female, 1 = male
    #[serde(rename = "Gender", deserialize_with = "lenient_int")]
    pub gender: i64,

    /// Age in years
    #[serde(rename = "Age", deserialize_with = "lenient_int")]
    pub age: i64,

    /// Label-encoded neighbourhood id (see `/neighbourhoods`)
    #[serde(rename = "Neighbourhood", deserialize_with = "lenient_int")]
    pub neighbourhood: i64,

    /// Enrolled in the welfare programme (0 or 1)
    #[serde(rename = "Scholarship", deserialize_with = "lenient_int")]
    pub scholarship: i64,

    /// 0 or 1
    #[serde(rename = "Hipertension", deserialize_with = "lenient_int")]
    pub hipertension: i64,

    /// 0 or 1
    #[serde(rename = "Diabetes", deserialize_with = "lenient_int")]
    pub diabetes: i64,

    /// 0 or 1
    #[serde(rename = "Alcoholism", deserialize_with = "lenient_int")]
    pub alcoholism: i64,

    /// Handicap level (0 to 4 in the source data)
    #[serde(rename = "Handcap", deserialize_with = "lenient_int")]
    pub handcap: i64,

    /// Reminder SMS received (0 or 1)
    #[serde(rename = "SMS_received", deserialize_with = "lenient_int")]
    pub sms_received: i64,

    /// Days between scheduling and the appointment
    #[serde(rename = "WaitDays", deserialize_with = "lenient_int")]
    pub wait_days: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IntLike::deserialize(deserializer) {
        Ok(IntLike::Int(value)) => Ok(value),
        Ok(IntLike::Float(value))
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Ok(IntLike::Float(value)) => Err(de::Error::custom(format!(
            "expected a whole number, got {}",
            value
        ))),
        Ok(IntLike::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("expected an integer, got {:?}", text))),
        Err(_) => Err(de::Error::custom("expected an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_dataset_keys() {
        let json = r#"{
            "Gender": 1, "Age": 42, "Neighbourhood": 7, "Scholarship": 0,
            "Hipertension": 1, "Diabetes": 0, "Alcoholism": 0, "Handcap": 2,
            "SMS_received": 1, "WaitDays": 14, "Extra": "ignored"
        }"#;

        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.age, 42);
        assert_eq!(request.neighbourhood, 7);
        assert_eq!(request.handcap, 2);
        assert_eq!(request.wait_days, 14);
    }

    #[test]
    fn test_rejects_missing_and_non_integer_fields() {
        let missing = r#"{"Gender": 1, "Age": 42}"#;
        assert!(serde_json::from_str::<PredictionRequest>(missing).is_err());

        let fractional = r#"{
            "Gender": 1, "Age": 42.5, "Neighbourhood": 7, "Scholarship": 0,
            "Hipertension": 1, "Diabetes": 0, "Alcoholism": 0, "Handcap": 2,
            "SMS_received": 1, "WaitDays": 14
        }"#;
        assert!(serde_json::from_str::<PredictionRequest>(fractional).is_err());

        let word = r#"{
            "Gender": 1, "Age": "forty", "Neighbourhood": 7, "Scholarship": 0,
            "Hipertension": 1, "Diabetes": 0, "Alcoholism": 0, "Handcap": 2,
            "SMS_received": 1, "WaitDays": 14
        }"#;
        assert!(serde_json::from_str::<PredictionRequest>(word).is_err());
    }

    #[test]
    fn test_accepts_numeric_strings_and_whole_floats() {
        let json = r#"{
            "Gender": "1", "Age": 29.0, "Neighbourhood": " 7 ", "Scholarship": 0,
            "Hipertension": 1, "Diabetes": 0, "Alcoholism": 0, "Handcap": 2.0,
            "SMS_received": 1, "WaitDays": "-3"
        }"#;

        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gender, 1);
        assert_eq!(request.age, 29);
        assert_eq!(request.neighbourhood, 7);
        assert_eq!(request.handcap, 2);
        assert_eq!(request.wait_days, -3);
    }
}
