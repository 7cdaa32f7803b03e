//! Join key for matching fixtures across sources that share no identifier.

use chrono::NaiveDate;

/// Placeholder used in place of a missing or unparseable date.
pub const MISSING_DATE_TOKEN: &str = "NAT";

/// Build a join key from two team names and a match date.
///
/// The key is symmetric (A vs B == B vs A) because the two sources may list
/// home and away in opposite orientation.
///
/// Format: `{team_low}_{team_high}_{YYYY-MM-DD}` where team_low <= team_high,
/// with `NAT` in place of a missing date. Two fixtures between the same teams
/// on the same day produce the same key and will be merged by the join.
pub fn build_key(team_a: &str, team_b: &str, date: Option<NaiveDate>) -> String {
    let (first, second) = if team_a <= team_b {
        (team_a, team_b)
    } else {
        (team_b, team_a)
    };

    let date_part = match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => MISSING_DATE_TOKEN.to_string(),
    };

    format!("{}_{}_{}", first, second, date_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(
            build_key("france", "peru", date(2022, 12, 18)),
            "france_peru_2022-12-18"
        );
    }

    #[test]
    fn test_key_symmetric() {
        let pairs = [
            ("france", "peru"),
            ("argentina", "france"),
            ("south korea", "portugal"),
            ("a", "a"),
            ("", "brazil"),
        ];
        for (a, b) in pairs {
            for d in [date(2022, 1, 1), date(1930, 7, 13), None] {
                assert_eq!(build_key(a, b, d), build_key(b, a, d));
            }
        }
    }

    #[test]
    fn test_key_missing_date() {
        let key = build_key("A", "B", None);
        assert!(key.ends_with("NAT"));
        assert_eq!(key, "A_B_NAT");
    }

    #[test]
    fn test_key_zero_pads_date() {
        assert!(build_key("a", "b", date(2022, 1, 1)).ends_with("2022-01-01"));
    }
}
