use super::super::profile::StudentProfile;
use super::MAX_SUGGESTIONS;

/// Prompt asking the generative service for a short numbered advice list.
pub(crate) fn build_prompt(profile: &StudentProfile, prediction: f64) -> String {
    fn text(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("N/A")
    }

    let summary = format!(
        "Student Profile:
- Age: {age}
- Study Hours per Day: {study} hours
- Social Media Usage: {social} hours/day
- Part-time Job: {job}
- Attendance: {attendance}%
- Sleep Duration: {sleep} hours
- Diet Quality: {diet}
- Exercise Frequency: {exercise} days/week
- Parental Education: {parents}
- Internet Access: {internet}
- Extracurricular Activities: {extracurricular}

Predicted Exam Score: {prediction}/100
",
        age = profile.age,
        study = profile.study_hours_per_day,
        social = profile.social_media_hours,
        job = text(&profile.part_time_job),
        attendance = profile.attendance_percentage,
        sleep = profile.sleep_hours,
        diet = text(&profile.diet_quality),
        exercise = profile.exercise_frequency,
        parents = text(&profile.parental_education_level),
        internet = text(&profile.internet_resource_accessibility),
        extracurricular = text(&profile.extracurricular_participation),
    );

    format!(
        "You are an educational advisor. Based on the following student profile and their \
predicted exam score, provide 4-5 specific, actionable suggestions to help them improve \
their academic performance.

{summary}
Please provide:
1. Specific, actionable suggestions (not generic advice)
2. Focus on the areas that need the most improvement based on their profile
3. Be encouraging and supportive
4. Format as a numbered list
5. Keep each suggestion concise (1-2 sentences)
6. Focus on practical, implementable changes

Suggestions:"
    )
}

/// Extract list items from a free-form response.
///
/// Numbered or bulleted lines are preferred; when none are found every
/// non-empty line is used instead.
pub(crate) fn parse_suggestions(response: &str) -> Vec<String> {
    let listed: Vec<String> = response
        .lines()
        .map(str::trim)
        .filter(|line| is_list_item(line))
        .map(strip_marker)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect();

    if !listed.is_empty() {
        return listed;
    }

    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// A leading `*` only counts as a bullet when followed by a space, so
/// markdown emphasis such as `**Heading:**` is not taken for a list item.
fn is_list_item(line: &str) -> bool {
    line.starts_with(|ch: char| ch.is_ascii_digit() || matches!(ch, '-' | '•'))
        || line.starts_with("* ")
}

fn strip_marker(line: &str) -> &str {
    let line = line.strip_prefix("* ").unwrap_or(line);
    line.trim_start_matches(|ch: char| {
        ch.is_ascii_digit() || matches!(ch, '.' | ')' | '-' | '•' | ' ')
    })
    .trim()
}
