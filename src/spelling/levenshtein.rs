//! Levenshtein distance calculation for fuzzy matching.
//!
//! The distance is the minimum number of single-element insertions,
//! deletions, or substitutions (each costing one) that turn one sequence into
//! another. Two interchangeable dynamic-programming layouts are provided,
//! see [`Strategy`]; both return identical results for every input.
//!
//! String helpers compare Unicode scalar values. Pure ASCII input is compared
//! byte-wise without collecting characters.

use std::cmp::min;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spelling::scratch::with_buffer;

/// Layout of the dynamic-programming table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One column of `len(a) + 1` cells, updated in place while scanning `b`.
    #[default]
    SingleColumn,
    /// Previous and current rows of `len(b) + 1` cells, swapped per row.
    TwoRow,
}

impl Strategy {
    /// Every strategy, for cross-checking.
    pub const ALL: [Strategy; 2] = [Strategy::SingleColumn, Strategy::TwoRow];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SingleColumn => "single_column",
            Strategy::TwoRow => "two_row",
        }
    }

    /// Distance between two slices of comparable elements.
    pub fn distance<T: PartialEq>(self, a: &[T], b: &[T]) -> Result<usize> {
        match self {
            Strategy::SingleColumn => single_column(a, b),
            Strategy::TwoRow => two_row(a, b),
        }
    }

    /// Distance between two strings, counted in characters.
    pub fn str_distance(self, a: &str, b: &str) -> Result<usize> {
        if a.is_ascii() && b.is_ascii() {
            return self.distance(a.as_bytes(), b.as_bytes());
        }
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        self.distance(&a_chars, &b_chars)
    }
}

/// Calculate the Levenshtein distance between two strings.
pub fn levenshtein_distance(s1: &str, s2: &str) -> Result<usize> {
    Strategy::default().str_distance(s1, s2)
}

/// Calculate the Levenshtein distance using a specific strategy.
pub fn levenshtein_distance_with(strategy: Strategy, s1: &str, s2: &str) -> Result<usize> {
    strategy.str_distance(s1, s2)
}

/// Calculate Levenshtein distance with a maximum threshold for early termination.
/// Returns `None` if the distance exceeds the threshold.
pub fn levenshtein_distance_threshold(
    s1: &str,
    s2: &str,
    threshold: usize,
) -> Result<Option<usize>> {
    if s1.is_ascii() && s2.is_ascii() {
        return bounded_distance(s1.as_bytes(), s2.as_bytes(), threshold);
    }
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    bounded_distance(&s1_chars, &s2_chars, threshold)
}

fn single_column<T: PartialEq>(a: &[T], b: &[T]) -> Result<usize> {
    if a.is_empty() {
        return Ok(b.len());
    }
    if b.is_empty() {
        return Ok(a.len());
    }

    with_buffer(a.len() + 1, |column| {
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = y;
        }

        for (x, b_item) in b.iter().enumerate() {
            column[0] = x + 1;
            // dp[y][x], carried down the column
            let mut last_diag = x;
            for (y, a_item) in a.iter().enumerate() {
                let old_diag = column[y + 1];
                let cost = usize::from(a_item != b_item);
                column[y + 1] = min(
                    min(
                        column[y + 1] + 1, // deletion
                        column[y] + 1,     // insertion
                    ),
                    last_diag + cost, // substitution
                );
                last_diag = old_diag;
            }
        }

        column[a.len()]
    })
}

fn two_row<T: PartialEq>(a: &[T], b: &[T]) -> Result<usize> {
    if a.is_empty() {
        return Ok(b.len());
    }
    if b.is_empty() {
        return Ok(a.len());
    }

    let width = b.len() + 1;
    with_buffer(2 * width, |buffer| {
        let (mut prev_row, mut curr_row) = buffer.split_at_mut(width);
        for (j, cell) in prev_row.iter_mut().enumerate() {
            *cell = j;
        }

        for (i, a_item) in a.iter().enumerate() {
            curr_row[0] = i + 1;
            for (j, b_item) in b.iter().enumerate() {
                let cost = usize::from(a_item != b_item);
                curr_row[j + 1] = min(
                    min(
                        prev_row[j + 1] + 1, // deletion
                        curr_row[j] + 1,     // insertion
                    ),
                    prev_row[j] + cost, // substitution
                );
            }
            std::mem::swap(&mut prev_row, &mut curr_row);
        }

        prev_row[b.len()]
    })
}

/// Two-row distance that gives up once every cell of a row exceeds
/// `threshold`, since row minima never decrease.
pub fn bounded_distance<T: PartialEq>(a: &[T], b: &[T], threshold: usize) -> Result<Option<usize>> {
    if a.len().abs_diff(b.len()) > threshold {
        return Ok(None);
    }
    if a.is_empty() || b.is_empty() {
        let distance = a.len().max(b.len());
        return Ok((distance <= threshold).then_some(distance));
    }

    let width = b.len() + 1;
    with_buffer(2 * width, |buffer| {
        let (mut prev_row, mut curr_row) = buffer.split_at_mut(width);
        for (j, cell) in prev_row.iter_mut().enumerate() {
            *cell = j;
        }

        for (i, a_item) in a.iter().enumerate() {
            curr_row[0] = i + 1;
            let mut min_in_row = curr_row[0];
            for (j, b_item) in b.iter().enumerate() {
                let cost = usize::from(a_item != b_item);
                curr_row[j + 1] = min(
                    min(prev_row[j + 1] + 1, curr_row[j] + 1),
                    prev_row[j] + cost,
                );
                min_in_row = min(min_in_row, curr_row[j + 1]);
            }

            if min_in_row > threshold {
                return None;
            }
            std::mem::swap(&mut prev_row, &mut curr_row);
        }

        let distance = prev_row[b.len()];
        (distance <= threshold).then_some(distance)
    })
}
