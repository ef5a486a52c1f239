use chrono::{Datelike as _, Local, NaiveDate};

/// Generate `count` distinct creative names for today's date.
///
/// Names are `<two-digit day><two-digit month><suffix>` where the suffix
/// walks the bijective base-26 sequence `A..Z, AA..AZ, BA..`. Within one
/// call the names are strictly increasing in that order and never repeat.
pub fn creative_names(count: usize) -> Vec<String> {
    names_for_date(count, Local::now().date_naive())
}

/// Pure variant of [`creative_names`] over an explicit date.
pub fn names_for_date(count: usize, date: NaiveDate) -> Vec<String> {
    let stamp = format!("{:02}{:02}", date.day(), date.month());
    (0..count)
        .map(|idx| format!("{stamp}{}", bijective_suffix(idx)))
        .collect()
}

/// Bijective base-26 numeral for `idx` over `A..=Z`.
///
/// Index 0 is `A`, 25 is `Z`, 26 is `AA` (not `BA`): after taking
/// `idx % 26` as the current letter, the remaining quotient is
/// decremented by 1 before the next digit.
fn bijective_suffix(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn suffix_crosses_digit_boundaries_bijectively() {
        assert_eq!(bijective_suffix(0), "A");
        assert_eq!(bijective_suffix(25), "Z");
        assert_eq!(bijective_suffix(26), "AA");
        assert_eq!(bijective_suffix(27), "AB");
        assert_eq!(bijective_suffix(51), "AZ");
        assert_eq!(bijective_suffix(52), "BA");
        assert_eq!(bijective_suffix(701), "ZZ");
        assert_eq!(bijective_suffix(702), "AAA");
    }

    #[test]
    fn names_carry_day_month_stamp() {
        let names = names_for_date(2, day());
        assert_eq!(names, vec!["0703A", "0703B"]);
    }

    #[test]
    fn twenty_sixth_name_rolls_to_double_letters() {
        let names = names_for_date(27, day());
        assert_eq!(names[25], "0703Z");
        assert_eq!(names[26], "0703AA");
    }

    #[test]
    fn thousand_names_are_distinct_and_strictly_increasing() {
        let names = names_for_date(1000, day());
        assert_eq!(names.len(), 1000);

        let mut seen = std::collections::HashSet::new();
        for name in &names {
            assert!(seen.insert(name.clone()), "duplicate name {name}");
        }

        // Bijective order: shorter suffixes first, lexicographic within a
        // length.
        for pair in names.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.len() < b.len() || (a.len() == b.len() && a < b),
                "{a} not before {b}"
            );
        }
    }
}
