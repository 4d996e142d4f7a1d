use std::cmp::Ordering;

use itertools::Itertools;

use super::Group;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortConfig {
    pub column: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortConfig {
            column: column.into(),
            direction,
        }
    }

    /// The configuration after a click on `column`.
    pub fn next(current: Option<&SortConfig>, column: &str) -> SortConfig {
        let direction = match current {
            Some(config)
                if config.column == column && config.direction == SortDirection::Ascending =>
            {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        SortConfig::new(column, direction)
    }
}

/// Reads the longest numeric prefix of `raw`, the way a browser's
/// `parseFloat` does: leading whitespace and trailing junk are ignored,
/// `"12ml"` is 12 and `"abc"` is not a number.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if text[end..].starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Numeric when both sides parse as numbers, ordinal string order otherwise.
/// Decided per pair, so a mixed column has no single global mode.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_leading_number(a), parse_leading_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Orders groups by their representative row. `None` keeps grouping order.
pub fn sort_groups<'a>(groups: Vec<Group<'a>>, config: Option<&SortConfig>) -> Vec<Group<'a>> {
    let Some(config) = config else {
        return groups;
    };

    let mut compare = |a: &Group<'a>, b: &Group<'a>| {
        let ordering = compare_values(
            a.representative.get(&config.column),
            b.representative.get(&config.column),
        );
        match config.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    };

    stable_sort_by(groups, &mut compare)
}

// The pairwise comparator is not transitive on mixed columns; `slice::sort_by`
// may panic on such input, a plain merge cannot.
fn stable_sort_by<T, F>(items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = stable_sort_by(left, compare);
    let right = stable_sort_by(right, compare);

    left.into_iter()
        .merge_by(right, |l, r| compare(l, r) != Ordering::Greater)
        .collect()
}
