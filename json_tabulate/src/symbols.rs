use log::debug;
use regex::Regex;

use std::{
    collections::{HashMap, HashSet},
    sync::OnceLock,
};

use crate::config::*;

/// Row identifiers, handed out in the order the sections are first seen.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RowSymbols {
    ids: HashMap<String, RowId>,
    // Indexed by the row id minus one.
    keys: Vec<String>,
}

impl RowSymbols {
    pub fn new() -> RowSymbols {
        RowSymbols::default()
    }

    /// Returns the identifier of the section, assigning the next one if the
    /// section was never seen before.
    pub fn intern(&mut self, key: &str) -> RowId {
        if let Some(rid) = self.ids.get(key) {
            return *rid;
        }
        let rid = RowId((self.keys.len() + 1) as u32);
        self.ids.insert(key.to_string(), rid);
        self.keys.push(key.to_string());
        rid
    }

    pub fn get(&self, key: &str) -> Option<RowId> {
        self.ids.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All the sections, by increasing identifier.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &String)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(idx, k)| (RowId((idx + 1) as u32), k))
    }
}

/// Column identifiers, handed out in sorted header order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnSymbols {
    ids: HashMap<Vec<String>, ColumnId>,
    // Indexed by the column id minus one.
    paths: Vec<Vec<String>>,
}

impl ColumnSymbols {
    /// Assigns identifiers to a set of header paths.
    ///
    /// The result does not depend on the order of the input.
    pub fn from_paths(paths: HashSet<Vec<String>>) -> ColumnSymbols {
        let mut sorted: Vec<Vec<String>> = paths.into_iter().collect();
        // Two paths that only differ after their third segment share a sort key.
        // The full path settles the order in that case.
        sorted.sort_by(|a, b| {
            column_sort_key(a)
                .cmp(&column_sort_key(b))
                .then_with(|| a.cmp(b))
        });
        let ids = sorted
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.clone(), ColumnId((idx + 1) as u32)))
            .collect();
        ColumnSymbols { ids, paths: sorted }
    }

    pub fn get(&self, path: &[String]) -> Option<ColumnId> {
        self.ids.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All the header paths, by increasing identifier.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &Vec<String>)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(idx, p)| (ColumnId((idx + 1) as u32), p))
    }
}

/// Sort key of a column header.
///
/// Fields are compared in declaration order: the first segment, the number
/// embedded in the second segment, then the third segment.
#[derive(Eq, PartialEq, Debug, Clone, Ord, PartialOrd)]
pub struct ColumnSortKey {
    pub first: String,
    pub number: SegmentNumber,
    pub third: String,
}

pub fn column_sort_key(path: &[String]) -> ColumnSortKey {
    ColumnSortKey {
        first: path.first().cloned().unwrap_or_default(),
        number: path
            .get(1)
            .map(|s| SegmentNumber::parse(s))
            .unwrap_or_default(),
        third: path.get(2).cloned().unwrap_or_default(),
    }
}

/// A non-negative integer read from a header segment.
///
/// It is kept as ASCII digits without leading zeros, so that numbers of any
/// length compare by value. Zero is the empty string.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct SegmentNumber(String);

impl SegmentNumber {
    /// The first run of decimal digits found anywhere in the segment.
    ///
    /// Digits of every script count: `3、`, `３、` and `٣` all read as 3.
    /// Segments without digits read as 0.
    pub fn parse(segment: &str) -> SegmentNumber {
        let digits: String = match digits_regex().find(segment) {
            Some(m) => m
                .as_str()
                .chars()
                .filter_map(decimal_value)
                .filter_map(|d| char::from_digit(d, 10))
                .collect(),
            None => String::new(),
        };
        SegmentNumber(digits.trim_start_matches('0').to_string())
    }

    /// The value, saturated to `u64::MAX`.
    pub fn value(&self) -> u64 {
        if self.0.is_empty() {
            0
        } else {
            self.0.parse::<u64>().unwrap_or(u64::MAX)
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl From<u64> for SegmentNumber {
    fn from(x: u64) -> SegmentNumber {
        if x == 0 {
            SegmentNumber::default()
        } else {
            SegmentNumber(x.to_string())
        }
    }
}

impl Ord for SegmentNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SegmentNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn digits_regex() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    // \d is the Unicode decimal digit class.
    DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    digits_regex().is_match(c.encode_utf8(&mut buf))
}

// Decimal digits are encoded in runs of consecutive code points going from
// zero to nine, so the value of a digit is its distance to the start of its
// run, modulo ten.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// The first run of decimal digits found anywhere in the segment, as a number.
///
/// Segments without digits yield 0. This lets numbered group labels such as
/// `3、基本信息` or `Q10 (follow-up)` sort numerically. Runs too large for a
/// `u64` saturate; the column order uses [`SegmentNumber`], which does not.
pub fn first_number(segment: &str) -> u64 {
    SegmentNumber::parse(segment).value()
}

/// Assigns the row identifiers of the records, in first-seen order.
pub fn assign_row_ids(records: &[FlatRecord]) -> RowSymbols {
    let mut rows = RowSymbols::new();
    for r in records.iter() {
        rows.intern(r.top_level_key());
    }
    debug!("assign_row_ids: {} sections", rows.len());
    rows
}

/// Assigns the column identifiers of the records, in sorted order.
pub fn assign_column_ids(records: &[FlatRecord]) -> ColumnSymbols {
    let unique: HashSet<Vec<String>> = records.iter().map(|r| r.column_path()).collect();
    debug!("assign_column_ids: {} distinct headers", unique.len());
    ColumnSymbols::from_paths(unique)
}
