//! # Numeric Checks
//!
//! Range, ordering and dimension checks shared by the model and the reader,
//! plus whitespace-separated text to typed vector conversion.

use std::str::FromStr;

use super::error::{DeckError, DeckResult};

/// Check that every value lies in `[low, high]`
///
/// NaN always fails.
pub fn lim_check(values: &[f64], low: f64, high: f64, message: &str) -> DeckResult<()> {
    if values.iter().all(|&v| v >= low && v <= high) {
        Ok(())
    } else {
        Err(DeckError::validation(message))
    }
}

/// Check that values are finite and strictly increasing
pub fn increasing_check(values: &[f64], message: &str) -> DeckResult<()> {
    let finite = values.iter().all(|v| v.is_finite());
    let ordered = values.windows(2).all(|w| w[0] < w[1]);
    if finite && ordered {
        Ok(())
    } else {
        Err(DeckError::validation(message))
    }
}

/// Largest fission matrix, in entries, that the reader will allocate
///
/// Two `f64` matrices of this size take 1 GiB together.
pub const MAX_MATRIX_ENTRIES: usize = 1 << 26;

/// Check fission-matrix dimensions
///
/// Zero rows or columns, rectangular shapes and matrices above
/// `MAX_MATRIX_ENTRIES` are rejected.
pub fn dim_check(rows: usize, cols: usize) -> DeckResult<()> {
    if rows == 0 || cols == 0 {
        return Err(DeckError::Dimension(format!(
            "Fission matrix has zero dimensions ({}x{})",
            rows, cols
        )));
    }
    if rows != cols {
        return Err(DeckError::Dimension(format!(
            "Fission matrix is rectangular ({}x{})",
            rows, cols
        )));
    }
    match rows.checked_mul(cols) {
        Some(entries) if entries <= MAX_MATRIX_ENTRIES => Ok(()),
        _ => Err(DeckError::Dimension(format!(
            "Fission matrix is too large ({}x{}, limit {} entries)",
            rows, cols, MAX_MATRIX_ENTRIES
        ))),
    }
}

/// Split on whitespace and parse every token as `T`
///
/// # Example
/// ```
/// use serpent_deck::core::numeric::str2vec;
/// let v: Vec<f64> = str2vec("1 2 3.5").unwrap();
/// assert_eq!(v, vec![1.0, 2.0, 3.5]);
/// ```
pub fn str2vec<T: FromStr>(text: &str) -> DeckResult<Vec<T>> {
    parse_all(text.split_whitespace())
}

/// Parse every item of an iterable of strings as `T`
pub fn parse_all<'a, T, I>(items: I) -> DeckResult<Vec<T>>
where
    T: FromStr,
    I: IntoIterator<Item = &'a str>,
{
    items
        .into_iter()
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| DeckError::validation(format!("cannot parse '{}'", s)))
        })
        .collect()
}
