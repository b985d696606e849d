//! Recurrence strings: `"1-8周,10周"`, `"1-3,5"`, `"2-16(周)"`.
//!
//! Parsing is tolerant. Each comma-separated token is tried on its own and
//! the successful ones are unioned; a bad token never spoils the rest.

use std::ops::RangeInclusive;

/// Markers stripped before tokenizing, longest first.
const DECORATIONS: &[&str] = &["(周)", "（周）", "周"];

/// A set of week numbers stored as sorted, disjoint, non-adjacent ranges.
///
/// Ranges are never expanded, so `1-4000000000` costs the same as `1-16`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveWeeks {
    ranges: Vec<RangeInclusive<u32>>,
}

impl ActiveWeeks {
    pub fn contains(&self, week: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(&week))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.ranges
    }

    /// Every week in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().cloned().flatten()
    }

    /// Union `range` in, merging with any range it overlaps or touches.
    fn insert(&mut self, range: RangeInclusive<u32>) {
        let (mut lo, mut hi) = range.into_inner();
        self.ranges.retain(|r| {
            let touches = *r.start() <= hi.saturating_add(1) && lo <= r.end().saturating_add(1);
            if touches {
                lo = lo.min(*r.start());
                hi = hi.max(*r.end());
            }
            !touches
        });
        let at = self.ranges.partition_point(|r| *r.start() < lo);
        self.ranges.insert(at, lo..=hi);
    }
}

/// Outcome of parsing a recurrence string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekRangeParse {
    /// Union of every token that parsed.
    pub weeks: ActiveWeeks,
    /// Tokens that did not parse, as written (after trimming).
    pub rejected: Vec<String>,
}

impl WeekRangeParse {
    pub fn contains(&self, week: u32) -> bool {
        self.weeks.contains(week)
    }
}

/// Parse `raw` into its active weeks, discarding malformed tokens.
pub fn parse_active_weeks(raw: &str) -> ActiveWeeks {
    parse_weeks(raw).weeks
}

/// Parse `raw`, keeping track of the tokens that were rejected.
pub fn parse_weeks(raw: &str) -> WeekRangeParse {
    let cleaned = DECORATIONS
        .iter()
        .fold(raw.to_string(), |acc, marker| acc.replace(marker, ""));

    cleaned
        .split([',', '，'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .fold(WeekRangeParse::default(), |mut acc, token| {
            match parse_token(token) {
                Some(range) => acc.weeks.insert(range),
                None => acc.rejected.push(token.to_string()),
            }
            acc
        })
}

/// `"3"` or `"lo-hi"` (inclusive). Reversed ranges are rejected.
fn parse_token(token: &str) -> Option<RangeInclusive<u32>> {
    match token.split_once('-') {
        Some((lo, hi)) => {
            let lo: u32 = lo.trim().parse().ok()?;
            let hi: u32 = hi.trim().parse().ok()?;
            (lo <= hi).then_some(lo..=hi)
        }
        None => {
            let week: u32 = token.parse().ok()?;
            Some(week..=week)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &str) -> Vec<u32> {
        parse_active_weeks(raw).iter().collect()
    }

    #[test]
    fn ranges_and_singles() {
        assert_eq!(set("1-3,5"), [1, 2, 3, 5]);
    }

    #[test]
    fn empty_and_garbage() {
        assert!(parse_active_weeks("").is_empty());
        assert!(parse_active_weeks("   ").is_empty());
        assert!(parse_active_weeks("abc").is_empty());
    }

    #[test]
    fn strips_decorations() {
        assert_eq!(set("1-8周,10周"), [1, 2, 3, 4, 5, 6, 7, 8, 10]);
        assert_eq!(set("2-4(周)"), [2, 3, 4]);
        assert_eq!(set(" 7（周） "), [7]);
    }

    #[test]
    fn whitespace_around_tokens_and_bounds() {
        assert_eq!(set(" 1 - 2 , 4 "), [1, 2, 4]);
    }

    #[test]
    fn full_width_comma() {
        assert_eq!(set("1-2，9"), [1, 2, 9]);
    }

    #[test]
    fn bad_token_does_not_abort() {
        let parsed = parse_weeks("1-3,x,5-y,7");
        assert_eq!(parsed.weeks.iter().collect::<Vec<_>>(), [1, 2, 3, 7]);
        assert_eq!(parsed.rejected, vec!["x".to_string(), "5-y".to_string()]);
    }

    #[test]
    fn malformed_ranges_rejected() {
        let parsed = parse_weeks("1-2-3,-4,8-5");
        assert!(parsed.weeks.is_empty());
        assert_eq!(parsed.rejected, vec!["1-2-3", "-4", "8-5"]);
    }

    #[test]
    fn empty_tokens_are_ignored() {
        let parsed = parse_weeks("1,,2,");
        assert_eq!(parsed.weeks.iter().collect::<Vec<_>>(), [1, 2]);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn no_upper_bound() {
        let parsed = parse_weeks("52,99-100");
        assert!(parsed.contains(52));
        assert!(parsed.contains(100));
        assert!(!parsed.contains(98));
    }

    #[test]
    fn overlapping_ranges_union() {
        assert_eq!(set("1-4,3-6,4"), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn huge_range_is_not_expanded() {
        let parsed = parse_weeks("1-4000000000");
        assert!(parsed.contains(5));
        assert!(parsed.contains(4_000_000_000));
        assert!(!parsed.contains(4_000_000_001));
        assert_eq!(parsed.weeks.ranges(), &[1..=4_000_000_000]);
    }

    #[test]
    fn merges_up_to_u32_max() {
        let weeks = parse_active_weeks("4294967290-4294967295,3,4294967289,1-2");
        assert_eq!(weeks.ranges(), &[1..=3, 4_294_967_289..=u32::MAX]);
        assert!(weeks.contains(u32::MAX));
        assert!(!weeks.contains(4));
    }

    #[test]
    fn ranges_are_merged_and_sorted() {
        let weeks = parse_active_weeks("10-12,1-2,4,3,20");
        assert_eq!(weeks.ranges(), &[1..=4, 10..=12, 20..=20]);
    }
}
