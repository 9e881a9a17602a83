//! # Fission Matrix Reader
//!
//! Parses the fission-matrix tally out of a solver result report.
//!
//! The report declares the matrix and then lists its entries:
//!
//! ```text
//! fmtx_t = zeros(2, 2);
//! fmtx_t (1, 1) = 5.0E-01 ; fmtx_t_err (1, 1) = 1.0E-03 ;
//! ```
//!
//! Indices are 1-based. Unlisted entries are zero.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::DMatrix;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::numeric::dim_check;
use crate::core::{DeckError, DeckResult, FissionMatrixSpec};

/// Matrix name written by the solver for the total fission matrix
pub const DEFAULT_MATRIX_NAME: &str = "fmtx_t";

const VALUE: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

/// Square value and uncertainty matrices of one tally
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FissionMatrix {
    values: DMatrix<f64>,
    uncertainties: DMatrix<f64>,
}

impl FissionMatrix {
    fn zeros(order: usize) -> Self {
        Self {
            values: DMatrix::zeros(order, order),
            uncertainties: DMatrix::zeros(order, order),
        }
    }

    /// Number of rows (and columns)
    pub fn order(&self) -> usize {
        self.values.nrows()
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Relative statistical errors, same shape as `values`
    pub fn uncertainties(&self) -> &DMatrix<f64> {
        &self.uncertainties
    }

    pub fn into_parts(self) -> (DMatrix<f64>, DMatrix<f64>) {
        (self.values, self.uncertainties)
    }
}

/// Reader for one named matrix in a report
#[derive(Debug, Clone)]
pub struct FissionMatrixReader {
    matrix_name: String,
}

/// Line patterns for one matrix name
struct Patterns {
    header: Regex,
    entry: Regex,
}

impl Patterns {
    fn new(name: &str) -> DeckResult<Self> {
        let n = regex::escape(name);
        let v = VALUE;
        let header = Regex::new(&format!(r"^\s*{n}\s*=\s*zeros\(\s*(\d+)\s*,\s*(\d+)\s*\)"));
        let entry = Regex::new(&format!(
            r"^\s*{n}\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)\s*=\s*({v})\s*;\s*{n}_err\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)\s*=\s*({v})"
        ));
        match (header, entry) {
            (Ok(header), Ok(entry)) => Ok(Self { header, entry }),
            (Err(e), _) | (_, Err(e)) => Err(DeckError::Validation(format!(
                "invalid matrix name '{}': {}",
                name, e
            ))),
        }
    }
}

impl FissionMatrixReader {
    /// Reader for `fmtx_t`
    pub fn new() -> Self {
        Self {
            matrix_name: DEFAULT_MATRIX_NAME.to_string(),
        }
    }

    /// Read another matrix from the same report, e.g. `fmtx_s`
    pub fn with_matrix_name(mut self, name: impl Into<String>) -> Self {
        self.matrix_name = name.into();
        self
    }

    pub fn matrix_name(&self) -> &str {
        &self.matrix_name
    }

    /// Read and parse the report at `path`
    pub fn read(&self, path: impl AsRef<Path>) -> DeckResult<FissionMatrix> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let matrix = self.parse_str(&text)?;
        info!(
            path = %path.display(),
            name = %self.matrix_name,
            order = matrix.order(),
            "fission matrix read"
        );
        Ok(matrix)
    }

    /// Read the report and check its order against the tally mesh
    pub fn read_for(
        &self,
        path: impl AsRef<Path>,
        spec: &FissionMatrixSpec,
    ) -> DeckResult<FissionMatrix> {
        let matrix = self.read(path)?;
        if matrix.order() != spec.order() {
            return Err(DeckError::Dimension(format!(
                "Fission matrix order {} does not match mesh cell count {}",
                matrix.order(),
                spec.order()
            )));
        }
        Ok(matrix)
    }

    /// Parse report text already in memory
    pub fn parse_str(&self, text: &str) -> DeckResult<FissionMatrix> {
        let patterns = Patterns::new(&self.matrix_name)?;
        let order = self.scan_header(&patterns.header, text)?;
        let mut matrix = FissionMatrix::zeros(order);

        for (lineno, line) in text.lines().enumerate() {
            let Some(caps) = patterns.entry.captures(line) else {
                if self.looks_like_entry(line) {
                    warn!(line = lineno + 1, "skipping malformed {} entry", self.matrix_name);
                }
                continue;
            };

            let row = self.index(&caps[1], order, lineno)?;
            let col = self.index(&caps[2], order, lineno)?;
            let err_at = (
                self.index(&caps[4], order, lineno)?,
                self.index(&caps[5], order, lineno)?,
            );
            if err_at != (row, col) {
                return Err(DeckError::Dimension(format!(
                    "Fission matrix entry ({}, {}) has its error at ({}, {}) on line {}",
                    &caps[1],
                    &caps[2],
                    &caps[4],
                    &caps[5],
                    lineno + 1
                )));
            }
            let value = parse_value(&caps[3], lineno)?;
            let error = parse_value(&caps[6], lineno)?;

            matrix.values[(row, col)] = value;
            matrix.uncertainties[(row, col)] = error;
            debug!(row = row + 1, col = col + 1, value, error, "fission matrix entry");
        }

        Ok(matrix)
    }

    /// Whether the report at `path` carries any fission-matrix output
    pub fn probe(path: impl AsRef<Path>) -> DeckResult<bool> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            if line?.trim_start().starts_with("fmtx") {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn scan_header(&self, header: &Regex, text: &str) -> DeckResult<usize> {
        let caps = text
            .lines()
            .find_map(|line| header.captures(line))
            .ok_or_else(|| {
                DeckError::NotFound(format!(
                    "Fission matrix '{}' not found in report",
                    self.matrix_name
                ))
            })?;

        let rows = parse_dim(&caps[1])?;
        let cols = parse_dim(&caps[2])?;
        dim_check(rows, cols)?;
        debug!(name = %self.matrix_name, order = rows, "fission matrix header");
        Ok(rows)
    }

    /// 1-based report index to 0-based matrix index
    fn index(&self, token: &str, order: usize, lineno: usize) -> DeckResult<usize> {
        match token.parse::<usize>() {
            Ok(i) if (1..=order).contains(&i) => Ok(i - 1),
            _ => Err(DeckError::Dimension(format!(
                "Fission matrix index {} out of range 1..={} on line {}",
                token,
                order,
                lineno + 1
            ))),
        }
    }

    fn looks_like_entry(&self, line: &str) -> bool {
        line.trim_start()
            .strip_prefix(self.matrix_name.as_str())
            .map(|rest| rest.trim_start().starts_with('('))
            .unwrap_or(false)
    }
}

impl Default for FissionMatrixReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_dim(token: &str) -> DeckResult<usize> {
    token
        .parse()
        .map_err(|_| DeckError::Dimension(format!("Invalid fission matrix dimension '{}'", token)))
}

fn parse_value(token: &str, lineno: usize) -> DeckResult<f64> {
    token.parse().map_err(|_| {
        DeckError::Dimension(format!(
            "Invalid fission matrix value '{}' on line {}",
            token,
            lineno + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Mesh;
    use std::fs;
    use tempfile::TempDir;

    const TWO_BY_TWO: &str = "\
% fission matrix output
fmtx_t = zeros(2, 2);
fmtx_t (1, 1) = 5.0E-01 ; fmtx_t_err (1, 1) = 1.0E-03 ;
";

    #[test]
    fn test_single_entry_report() {
        let fm = FissionMatrixReader::new().parse_str(TWO_BY_TWO).unwrap();
        assert_eq!(fm.order(), 2);
        assert_eq!(fm.values()[(0, 0)], 0.5);
        assert_eq!(fm.uncertainties()[(0, 0)], 0.001);
        for (r, c) in [(0, 1), (1, 0), (1, 1)] {
            assert_eq!(fm.values()[(r, c)], 0.0);
            assert_eq!(fm.uncertainties()[(r, c)], 0.0);
        }
    }

    #[test]
    fn test_zero_dimension_fails() {
        let err = FissionMatrixReader::new()
            .parse_str("fmtx_t = zeros(0,5);\n")
            .unwrap_err();
        assert!(matches!(err, DeckError::Dimension(_)));
    }

    #[test]
    fn test_oversized_header_fails_without_allocating() {
        for header in ["fmtx_t = zeros(4294967296,4294967296);", "fmtx_t = zeros(100000,100000);"] {
            let err = FissionMatrixReader::new().parse_str(header).unwrap_err();
            assert!(matches!(err, DeckError::Dimension(_)));
        }
        let err = FissionMatrixReader::new()
            .parse_str("fmtx_t = zeros(99999999999999999999999,1);")
            .unwrap_err();
        assert!(matches!(err, DeckError::Dimension(_)));
    }

    #[test]
    fn test_error_index_must_match_value_index() {
        let text = "\
fmtx_t = zeros(2,2);
fmtx_t (1, 1) = 5.0E-01 ; fmtx_t_err (2, 2) = 1.0E-03 ;
";
        let err = FissionMatrixReader::new().parse_str(text).unwrap_err();
        assert!(matches!(err, DeckError::Dimension(_)));

        let padded = "\
fmtx_t = zeros(2,2);
fmtx_t (1, 2) = 5.0E-01 ; fmtx_t_err (01, 2) = 1.0E-03 ;
";
        let fm = FissionMatrixReader::new().parse_str(padded).unwrap();
        assert_eq!(fm.uncertainties()[(0, 1)], 0.001);
    }

    #[test]
    fn test_rectangular_fails() {
        let err = FissionMatrixReader::new()
            .parse_str("fmtx_t = zeros(3,4);\n")
            .unwrap_err();
        assert!(matches!(err, DeckError::Dimension(_)));
    }

    #[test]
    fn test_header_without_data_is_zero_matrix() {
        let fm = FissionMatrixReader::new().parse_str("fmtx_t = zeros(3,3);\n").unwrap();
        assert_eq!(fm.order(), 3);
        assert!(fm.values().iter().all(|&v| v == 0.0));
        assert!(fm.uncertainties().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_missing_header_is_not_found() {
        let err = FissionMatrixReader::new()
            .parse_str("fmtx_t (1, 1) = 1.0 ; fmtx_t_err (1, 1) = 0.1\n")
            .unwrap_err();
        assert!(matches!(err, DeckError::NotFound(_)));
    }

    #[test]
    fn test_entries_before_header_and_between_junk() {
        let text = "\
fmtx_t (2, 1) = 2.5E-01 ; fmtx_t_err (2, 1) = 4.0E-03 ;
ANA_KEFF = [ 1.00 0.001 ];
fmtx_t = zeros(2,2);
   random junk
fmtx_t(1,2)=1.5e-1;fmtx_t_err(1,2)=2e-3;
";
        let fm = FissionMatrixReader::new().parse_str(text).unwrap();
        assert_eq!(fm.values()[(1, 0)], 0.25);
        assert_eq!(fm.uncertainties()[(1, 0)], 0.004);
        assert_eq!(fm.values()[(0, 1)], 0.15);
        assert_eq!(fm.uncertainties()[(0, 1)], 0.002);
        assert_eq!(fm.values()[(0, 0)], 0.0);
    }

    #[test]
    fn test_last_entry_wins() {
        let text = "\
fmtx_t = zeros(1,1);
fmtx_t (1, 1) = 1.0 ; fmtx_t_err (1, 1) = 0.1 ;
fmtx_t (1, 1) = 2.0 ; fmtx_t_err (1, 1) = 0.2 ;
";
        let fm = FissionMatrixReader::new().parse_str(text).unwrap();
        assert_eq!(fm.values()[(0, 0)], 2.0);
        assert_eq!(fm.uncertainties()[(0, 0)], 0.2);
    }

    #[test]
    fn test_out_of_range_index() {
        for entry in [
            "fmtx_t (3, 1) = 1.0 ; fmtx_t_err (3, 1) = 0.1",
            "fmtx_t (0, 1) = 1.0 ; fmtx_t_err (0, 1) = 0.1",
        ] {
            let text = format!("fmtx_t = zeros(2,2);\n{}\n", entry);
            let err = FissionMatrixReader::new().parse_str(&text).unwrap_err();
            assert!(matches!(err, DeckError::Dimension(_)));
        }
    }

    #[test]
    fn test_other_matrix_name() {
        let text = "\
fmtx_t = zeros(1,1);
fmtx_s = zeros(2,2);
fmtx_s (2, 2) = 7.0E-01 ; fmtx_s_err (2, 2) = 5.0E-03 ;
";
        let reader = FissionMatrixReader::new().with_matrix_name("fmtx_s");
        assert_eq!(reader.matrix_name(), "fmtx_s");
        let fm = reader.parse_str(text).unwrap();
        assert_eq!(fm.order(), 2);
        assert_eq!(fm.values()[(1, 1)], 0.7);

        let total = FissionMatrixReader::new().parse_str(text).unwrap();
        assert_eq!(total.order(), 1);
        assert_eq!(total.values()[(0, 0)], 0.0);
    }

    #[test]
    fn test_read_for_matches_mesh_order() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("core_res.m");
        fs::write(&path, "fmtx_t = zeros(4,4);\n").unwrap();

        let reader = FissionMatrixReader::new();
        let matching = FissionMatrixSpec::cartesian(Mesh::radial(1.0, 2).unwrap());
        assert_eq!(reader.read_for(&path, &matching).unwrap().order(), 4);

        let other = FissionMatrixSpec::cartesian(Mesh::radial(1.0, 3).unwrap());
        let err = reader.read_for(&path, &other).unwrap_err();
        assert!(matches!(err, DeckError::Dimension(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("absent_res.m");
        let err = FissionMatrixReader::new().read(&path).unwrap_err();
        assert!(matches!(err, DeckError::Io(_)));
        assert!(FissionMatrixReader::probe(&path).is_err());
    }

    #[test]
    fn test_probe() {
        let temp = TempDir::new().expect("tempdir should be created");
        let with = temp.path().join("with_res.m");
        let without = temp.path().join("without_res.m");
        fs::write(&with, TWO_BY_TWO).unwrap();
        fs::write(&without, "ANA_KEFF = [ 1.0 ];\n").unwrap();

        assert!(FissionMatrixReader::probe(&with).unwrap());
        assert!(!FissionMatrixReader::probe(&without).unwrap());
    }

    #[test]
    fn test_into_parts() {
        let fm = FissionMatrixReader::new().parse_str(TWO_BY_TWO).unwrap();
        let (values, errors) = fm.into_parts();
        assert_eq!(values.shape(), (2, 2));
        assert_eq!(errors.shape(), (2, 2));
    }
}
