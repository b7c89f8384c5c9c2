//! Small numeric and text helpers shared by the query and overview code.

/// Arithmetic mean of `values`, or `None` when empty.
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of `values`, or `None` when empty.
///
/// Works on a sorted copy; the input is left untouched. For an even number of
/// values the mean of the two middle elements is returned.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let half = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[half])
    } else {
        Some((sorted[half - 1] + sorted[half]) / 2.0)
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_is_none() {
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn average_of_values() {
        assert_eq!(average(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
    }

    #[test]
    fn median_odd_count() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn median_even_count_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn median_does_not_reorder_input() {
        let values = [3.0, 1.0, 2.0];
        let _ = median(&values);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn median_of_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn contains_ignores_case() {
        assert!(contains_ignore_case("fast/Canvas/arc.html", "CANVAS"));
        assert!(!contains_ignore_case("fast/canvas/arc.html", "svg"));
    }

    #[test]
    fn starts_with_ignores_case() {
        assert!(starts_with_ignore_case("Fast/css/a.html", "fast/"));
        assert!(!starts_with_ignore_case("fast/css/a.html", "css"));
    }
}
