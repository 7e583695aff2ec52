//! User stats recomputation
//!
//! Stats are always derived from the full course set; nothing here is incremental.

use courseforge_common::types::{Course, UserStats};

/// Hours encoded in a duration string such as `"2h 30m"`
///
/// Only the text before the first `h` counts, so `"2h 30m"` is 2.0 and `"45m"` is 0.
/// Unparsable, negative, or non-finite values contribute 0.
pub fn parse_duration_hours(duration: &str) -> f64 {
    duration
        .split_once('h')
        .and_then(|(hours, _)| hours.trim().parse::<f64>().ok())
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
        .unwrap_or(0.0)
}

/// Compute stats from `(duration, progress)` pairs
pub fn compute_from_parts<'a, I>(courses: I) -> UserStats
where
    I: IntoIterator<Item = (&'a str, u8)>,
{
    let mut total_courses: u32 = 0;
    let mut completed_courses: u32 = 0;
    let mut weighted_hours = 0.0_f64;
    let mut progress_sum: u64 = 0;

    for (duration, progress) in courses {
        total_courses += 1;
        if progress == 100 {
            completed_courses += 1;
        }
        weighted_hours += parse_duration_hours(duration) * f64::from(progress) / 100.0;
        progress_sum += u64::from(progress);
    }

    let average_progress = if total_courses == 0 {
        0
    } else {
        (progress_sum as f64 / f64::from(total_courses)).round() as u8
    };

    UserStats {
        total_courses,
        completed_courses,
        total_hours: weighted_hours.floor() as u32,
        average_progress,
    }
}

/// Compute stats for a user's courses
pub fn compute_stats(courses: &[Course]) -> UserStats {
    compute_from_parts(courses.iter().map(|c| (c.duration.as_str(), c.progress)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration_hours("2h 30m"), 2.0);
        assert_eq!(parse_duration_hours("3h"), 3.0);
        assert_eq!(parse_duration_hours("1.5h"), 1.5);
        assert_eq!(parse_duration_hours(" 4 h"), 4.0);
        assert_eq!(parse_duration_hours("45m"), 0.0);
        assert_eq!(parse_duration_hours("abch"), 0.0);
        assert_eq!(parse_duration_hours("-2h"), 0.0);
        assert_eq!(parse_duration_hours("infh"), 0.0);
        assert_eq!(parse_duration_hours(""), 0.0);
    }

    #[test]
    fn test_mixed_progress() {
        let stats = compute_from_parts([("2h", 100), ("4h", 50), ("1h", 0)]);
        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.completed_courses, 1);
        assert_eq!(stats.total_hours, 4);
        assert_eq!(stats.average_progress, 50);
    }

    #[test]
    fn test_empty_course_set() {
        assert_eq!(compute_from_parts(Vec::<(&str, u8)>::new()), UserStats::default());
    }

    #[test]
    fn test_hours_are_floored() {
        // 2.5 * 0.5 + 3 * 0.5 = 2.75
        let stats = compute_from_parts([("2.5h", 50), ("3h 15m", 50)]);
        assert_eq!(stats.total_hours, 2);
    }

    #[test]
    fn test_average_rounds() {
        let stats = compute_from_parts([("1h", 33), ("1h", 34)]);
        assert_eq!(stats.average_progress, 34);
    }
}
