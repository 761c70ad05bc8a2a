//! Daily activity streaks

use chrono::{Duration, NaiveDate};

/// Consecutive active days ending today, or yesterday when today has no activity yet
///
/// `dates` may be unsorted and contain duplicates.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut check_date = today;
    if !dates.contains(&check_date) {
        // Today might not be over yet
        check_date = check_date - Duration::days(1);
        if !dates.contains(&check_date) {
            return 0;
        }
    }

    let mut streak = 0;
    while dates.contains(&check_date) {
        streak += 1;
        check_date = check_date - Duration::days(1);
    }
    streak
}

/// Longest run of consecutive active days
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted.dedup();

    if sorted.is_empty() {
        return 0;
    }

    let mut longest = 0;
    let mut current = 1;
    for pair in sorted.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            current += 1;
        } else {
            longest = longest.max(current);
            current = 1;
        }
    }
    longest.max(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_empty() {
        assert_eq!(current_streak(&[], day(10)), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_current_streak_includes_today() {
        let dates = [day(8), day(9), day(10), day(10)];
        assert_eq!(current_streak(&dates, day(10)), 3);
    }

    #[test]
    fn test_current_streak_may_end_yesterday() {
        let dates = [day(7), day(8), day(9)];
        assert_eq!(current_streak(&dates, day(10)), 3);
    }

    #[test]
    fn test_current_streak_broken() {
        let dates = [day(5), day(6), day(8)];
        assert_eq!(current_streak(&dates, day(10)), 0);
    }

    #[test]
    fn test_longest_streak_finds_best_run() {
        let dates = [day(9), day(1), day(2), day(3), day(3), day(6), day(7)];
        assert_eq!(longest_streak(&dates), 3);
    }
}
