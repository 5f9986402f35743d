use super::super::profile::StudentProfile;
use super::MAX_SUGGESTIONS;

const LOW_SCORE_THRESHOLD: f64 = 60.0;
const HIGH_SCORE_THRESHOLD: f64 = 80.0;

/// Deterministic advice built from the score tier and profile habits.
///
/// Tier advice always comes first, followed by the habit triggers in fixed
/// order; the result never exceeds five entries.
pub(crate) fn rule_based_suggestions(profile: &StudentProfile, prediction: f64) -> Vec<String> {
    let mut suggestions: Vec<&'static str> = Vec::with_capacity(7);

    if prediction < LOW_SCORE_THRESHOLD {
        suggestions.push(
            "Focus on improving your study habits. Aim for at least 4-6 hours of dedicated study time per day.",
        );
        suggestions.push(
            "Increase your attendance rate. Regular class attendance is crucial for understanding course material.",
        );
    } else if prediction < HIGH_SCORE_THRESHOLD {
        suggestions.push("Maintain consistent study hours and create a structured study schedule.");
        suggestions.push(
            "Consider reducing social media usage to maximize productive study time.",
        );
    } else {
        suggestions.push(
            "Continue maintaining your excellent study habits and academic performance.",
        );
        suggestions.push(
            "Consider helping peers or engaging in advanced topics to further enhance your learning.",
        );
    }

    if profile.study_hours_per_day < 3.0 {
        suggestions.push(
            "Increase your daily study hours gradually. Start with 3-4 hours and build up to 5-6 hours.",
        );
    }

    if profile.attendance_percentage < 80.0 {
        suggestions.push(
            "Improve your attendance rate. Aim for at least 85-90% attendance to stay on track with coursework.",
        );
    }

    if profile.social_media_hours > 4.0 {
        suggestions.push(
            "Reduce social media usage. Limit it to 1-2 hours per day to free up more time for studying.",
        );
    }

    if profile.sleep_hours < 6.0 || profile.sleep_hours > 9.0 {
        suggestions.push(
            "Maintain a consistent sleep schedule of 7-8 hours per night for optimal cognitive performance.",
        );
    }

    if profile.exercise_frequency < 3 {
        suggestions.push(
            "Incorporate regular exercise (3-4 times per week) to improve focus and reduce stress.",
        );
    }

    suggestions
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}
