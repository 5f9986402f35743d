use serde::Serialize;

use super::profile::{field, StudentProfile};

/// Column order expected by the regression model.
pub const FEATURE_SCHEMA: [&str; 12] = [
    field::AGE,
    field::GENDER,
    field::STUDY_HOURS_PER_DAY,
    field::SOCIAL_MEDIA_HOURS,
    field::PART_TIME_JOB,
    field::ATTENDANCE_PERCENTAGE,
    field::SLEEP_HOURS,
    field::DIET_QUALITY,
    field::EXERCISE_FREQUENCY,
    field::PARENTAL_EDUCATION_LEVEL,
    field::INTERNET_RESOURCE_ACCESSIBILITY,
    field::EXTRACURRICULAR_PARTICIPATION,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
    Category(Option<String>),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(value) => Some(*value as f64),
            FeatureValue::Float(value) => Some(*value),
            FeatureValue::Category(_) => None,
        }
    }
}

/// One named column holding a single-row sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureColumn {
    pub name: &'static str,
    pub values: Vec<FeatureValue>,
}

/// Single-row tabular input for the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    columns: Vec<FeatureColumn>,
}

impl FeatureRow {
    pub fn assemble(profile: &StudentProfile) -> Self {
        let values = [
            FeatureValue::Integer(profile.age),
            FeatureValue::Category(profile.gender.clone()),
            FeatureValue::Float(profile.study_hours_per_day),
            FeatureValue::Float(profile.social_media_hours),
            FeatureValue::Category(profile.part_time_job.clone()),
            FeatureValue::Float(profile.attendance_percentage),
            FeatureValue::Float(profile.sleep_hours),
            FeatureValue::Category(profile.diet_quality.clone()),
            FeatureValue::Integer(profile.exercise_frequency),
            FeatureValue::Category(profile.parental_education_level.clone()),
            FeatureValue::Category(profile.internet_resource_accessibility.clone()),
            FeatureValue::Category(profile.extracurricular_participation.clone()),
        ];

        let columns = FEATURE_SCHEMA
            .into_iter()
            .zip(values)
            .map(|(name, value)| FeatureColumn {
                name,
                values: vec![value],
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// First-row value of the named column.
    pub fn value(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .and_then(|column| column.values.first())
    }

    #[cfg(test)]
    pub(crate) fn from_columns(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }
}
