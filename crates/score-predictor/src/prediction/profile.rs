use std::collections::HashMap;

use serde_json::{Map, Value};

/// Wire names of the twelve profile fields, in model schema order.
pub mod field {
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const STUDY_HOURS_PER_DAY: &str = "study_hours_per_day";
    pub const SOCIAL_MEDIA_HOURS: &str = "social_media_hours";
    pub const PART_TIME_JOB: &str = "part_time_job";
    pub const ATTENDANCE_PERCENTAGE: &str = "attendance_percentage";
    pub const SLEEP_HOURS: &str = "sleep_hours";
    pub const DIET_QUALITY: &str = "diet_quality";
    pub const EXERCISE_FREQUENCY: &str = "exercise_frequency";
    pub const PARENTAL_EDUCATION_LEVEL: &str = "parental_education_level";
    pub const INTERNET_RESOURCE_ACCESSIBILITY: &str = "internet_Resource_accessibility";
    pub const EXTRACURRICULAR_PARTICIPATION: &str = "extracurricular_participation";
}

/// Untyped request payload keyed by wire field name.
///
/// JSON bodies keep their native value types while form bodies contribute
/// strings only; both normalize through the same rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProfile(Map<String, Value>);

impl RawProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_form(fields: HashMap<String, String>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Typed, canonical representation of one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub age: i64,
    pub gender: Option<String>,
    pub study_hours_per_day: f64,
    pub social_media_hours: f64,
    pub part_time_job: Option<String>,
    pub attendance_percentage: f64,
    pub sleep_hours: f64,
    pub diet_quality: Option<String>,
    pub exercise_frequency: i64,
    pub parental_education_level: Option<String>,
    pub internet_resource_accessibility: Option<String>,
    pub extracurricular_participation: Option<String>,
}

impl StudentProfile {
    /// Validate and normalize a raw payload in one pass.
    ///
    /// `age` is required. The remaining numeric fields fall back to zero when
    /// absent, and categorical fields stay `None`. No range checks are applied.
    pub fn from_raw(raw: &RawProfile) -> Result<Self, ValidationError> {
        let age = match raw.get(field::AGE) {
            Some(value) => parse_integer(field::AGE, value)?,
            None => return Err(ValidationError::MissingField(field::AGE)),
        };

        Ok(Self {
            age,
            gender: categorical(raw, field::GENDER),
            study_hours_per_day: float_or_default(raw, field::STUDY_HOURS_PER_DAY, 0.0)?,
            social_media_hours: float_or_default(raw, field::SOCIAL_MEDIA_HOURS, 0.0)?,
            part_time_job: categorical(raw, field::PART_TIME_JOB),
            attendance_percentage: float_or_default(raw, field::ATTENDANCE_PERCENTAGE, 0.0)?,
            sleep_hours: float_or_default(raw, field::SLEEP_HOURS, 0.0)?,
            diet_quality: categorical(raw, field::DIET_QUALITY),
            exercise_frequency: integer_or_default(raw, field::EXERCISE_FREQUENCY, 0)?,
            parental_education_level: categorical(raw, field::PARENTAL_EDUCATION_LEVEL),
            internet_resource_accessibility: categorical(
                raw,
                field::INTERNET_RESOURCE_ACCESSIBILITY,
            ),
            extracurricular_participation: categorical(raw, field::EXTRACURRICULAR_PARTICIPATION),
        })
    }
}

/// Raised when a payload field is missing or cannot be coerced to its type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be an integer, got {found}")]
    InvalidInteger { field: &'static str, found: String },
    #[error("field '{field}' must be a number, got {found}")]
    InvalidNumber { field: &'static str, found: String },
    #[error("field '{field}' must be a finite number, got {found}")]
    NonFinite { field: &'static str, found: String },
}

/// Trim and title-case a categorical value. `None` passes through.
pub fn normalize_category(value: Option<&str>) -> Option<String> {
    value.map(|raw| title_case(raw.trim()))
}

fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_cased = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_cased {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_cased = true;
        } else {
            output.push(ch);
            previous_cased = false;
        }
    }
    output
}

fn categorical(raw: &RawProfile, name: &'static str) -> Option<String> {
    match raw.get(name)? {
        Value::Null => None,
        Value::String(text) => normalize_category(Some(text.as_str())),
        Value::Bool(flag) => normalize_category(Some(if *flag { "true" } else { "false" })),
        other => normalize_category(Some(other.to_string().as_str())),
    }
}

fn float_or_default(
    raw: &RawProfile,
    name: &'static str,
    default: f64,
) -> Result<f64, ValidationError> {
    raw.get(name)
        .map_or(Ok(default), |value| parse_float(name, value))
}

fn integer_or_default(
    raw: &RawProfile,
    name: &'static str,
    default: i64,
) -> Result<i64, ValidationError> {
    raw.get(name)
        .map_or(Ok(default), |value| parse_integer(name, value))
}

fn parse_float(name: &'static str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    let number = parsed.ok_or_else(|| ValidationError::InvalidNumber {
        field: name,
        found: describe(value),
    })?;

    if number.is_finite() {
        Ok(number)
    } else {
        Err(ValidationError::NonFinite {
            field: name,
            found: describe(value),
        })
    }
}

fn parse_integer(name: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidInteger {
        field: name,
        found: describe(value),
    };

    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            let float = number.as_f64().ok_or_else(invalid)?;
            if float.is_finite() && float.abs() < i64::MAX as f64 {
                Ok(float.trunc() as i64)
            } else {
                Err(invalid())
            }
        }
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid()),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{text}'"),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawProfile {
        match value {
            Value::Object(map) => RawProfile::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn normalize_category_trims_and_title_cases() {
        assert_eq!(normalize_category(Some("  male ")), Some("Male".to_string()));
        assert_eq!(
            normalize_category(Some("high SCHOOL")),
            Some("High School".to_string())
        );
        assert_eq!(
            normalize_category(Some("part-time")),
            Some("Part-Time".to_string())
        );
        assert_eq!(normalize_category(None), None);
    }

    #[test]
    fn normalize_category_is_idempotent() {
        let once = normalize_category(Some("  male  "));
        let twice = normalize_category(once.as_deref());
        assert_eq!(once, twice);
        assert_eq!(twice.as_deref(), Some("Male"));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let profile = StudentProfile::from_raw(&raw(json!({ "age": 19 }))).expect("valid");
        assert_eq!(profile.age, 19);
        assert_eq!(profile.study_hours_per_day, 0.0);
        assert_eq!(profile.attendance_percentage, 0.0);
        assert_eq!(profile.exercise_frequency, 0);
        assert!(profile.gender.is_none());
        assert!(profile.internet_resource_accessibility.is_none());
    }

    #[test]
    fn missing_age_is_rejected() {
        let err = StudentProfile::from_raw(&raw(json!({ "gender": "Male" })))
            .expect_err("age is required");
        assert_eq!(err, ValidationError::MissingField("age"));
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let err = StudentProfile::from_raw(&raw(json!({ "age": "not_a_number" })))
            .expect_err("age must parse");
        assert!(matches!(err, ValidationError::InvalidInteger { field: "age", .. }));
        assert!(err.to_string().contains("not_a_number"));
    }

    #[test]
    fn null_age_is_rejected() {
        assert!(StudentProfile::from_raw(&raw(json!({ "age": null }))).is_err());
    }

    #[test]
    fn form_strings_are_coerced() {
        let mut fields = HashMap::new();
        fields.insert("age".to_string(), " 20 ".to_string());
        fields.insert("study_hours_per_day".to_string(), "5.5".to_string());
        fields.insert("exercise_frequency".to_string(), "3".to_string());
        fields.insert(
            "internet_Resource_accessibility".to_string(),
            " good ".to_string(),
        );

        let profile = StudentProfile::from_raw(&RawProfile::from_form(fields)).expect("valid");
        assert_eq!(profile.age, 20);
        assert_eq!(profile.study_hours_per_day, 5.5);
        assert_eq!(profile.exercise_frequency, 3);
        assert_eq!(
            profile.internet_resource_accessibility.as_deref(),
            Some("Good")
        );
    }

    #[test]
    fn fractional_integer_strings_are_rejected_but_json_floats_truncate() {
        let err = StudentProfile::from_raw(&raw(json!({ "age": "20.5" })))
            .expect_err("integer strings must be whole");
        assert!(matches!(err, ValidationError::InvalidInteger { .. }));

        let profile =
            StudentProfile::from_raw(&raw(json!({ "age": 20.9, "exercise_frequency": 3.2 })))
                .expect("json floats truncate");
        assert_eq!(profile.age, 20);
        assert_eq!(profile.exercise_frequency, 3);
    }

    #[test]
    fn non_numeric_float_field_is_rejected() {
        let err = StudentProfile::from_raw(&raw(json!({ "age": 20, "sleep_hours": "lots" })))
            .expect_err("sleep hours must parse");
        assert!(matches!(
            err,
            ValidationError::InvalidNumber {
                field: "sleep_hours",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = StudentProfile::from_raw(&raw(json!({ "age": 20, "sleep_hours": "NaN" })))
            .expect_err("NaN is not a usable feature");
        assert!(matches!(err, ValidationError::NonFinite { .. }));
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let profile =
            StudentProfile::from_raw(&raw(json!({ "age": 20, "attendance_percentage": 150 })))
                .expect("no range validation");
        assert_eq!(profile.attendance_percentage, 150.0);
    }

    #[test]
    fn non_string_categoricals_are_rendered_as_text() {
        let profile = StudentProfile::from_raw(&raw(json!({
            "age": 20,
            "part_time_job": true,
            "diet_quality": 3,
            "gender": null,
        })))
        .expect("valid");
        assert_eq!(profile.part_time_job.as_deref(), Some("True"));
        assert_eq!(profile.diet_quality.as_deref(), Some("3"));
        assert!(profile.gender.is_none());
    }
}
