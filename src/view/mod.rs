//! Derive the visible table rows from the full roster
//!
//! Filtering is a case-insensitive substring match on the name. Text columns sort
//! with a three-level collation in the style of the Unicode collation algorithm:
//! base letters first, then accents, then case with lowercase ahead of uppercase.
//! Letters that carry a stroke or ligature and do not decompose (Đ, Ø, Ł, Æ, ß)
//! are folded onto their base letter so "Đức" sorts after "Dung" and before "Em".

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{EmployeeRecord, SortKey};

/// Filter by `query` and order by `sort`; `None` keeps stored order
pub fn visible<'a>(
    records: &'a [EmployeeRecord],
    query: &str,
    sort: Option<SortKey>,
) -> Vec<&'a EmployeeRecord> {
    let needle = query.to_lowercase();
    let mut rows: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect();

    match sort {
        Some(SortKey::Id) => rows.sort_by_key(|e| e.id),
        Some(SortKey::Name) => rows.sort_by_cached_key(|e| CollationKey::new(&e.name)),
        Some(SortKey::Address) => rows.sort_by_cached_key(|e| CollationKey::new(&e.address)),
        None => {}
    }
    rows
}

/// Locale-style comparison of two strings
pub fn collate(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Sort key compared level by level; field order is significant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    /// Base letters; the second element ranks a stroked letter after its base
    primary: Vec<(char, u8)>,
    /// Lowercased text with combining marks kept
    secondary: String,
    /// `true` per uppercase letter, so lowercase sorts first
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let decomposed: Vec<char> = s.nfd().collect();
        let bases = || decomposed.iter().copied().filter(|c| !is_combining_mark(*c));

        let mut primary = Vec::with_capacity(decomposed.len());
        for c in bases().flat_map(char::to_lowercase) {
            match c {
                'đ' => primary.push(('d', 1)),
                'ħ' => primary.push(('h', 1)),
                'ł' => primary.push(('l', 1)),
                'ø' => primary.push(('o', 1)),
                'æ' => primary.push(('a', 1)),
                'ß' => primary.extend([('s', 0), ('s', 0)]),
                'œ' => primary.extend([('o', 0), ('e', 0)]),
                other => primary.push((other, 0)),
            }
        }

        Self {
            primary,
            secondary: decomposed.iter().copied().flat_map(char::to_lowercase).collect(),
            tertiary: bases().map(char::is_uppercase).collect(),
            raw: s.to_string(),
        }
    }
}
