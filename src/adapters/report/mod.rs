//! Report readers - parse solver output back into typed values

mod fission_matrix;

pub use fission_matrix::{FissionMatrix, FissionMatrixReader, DEFAULT_MATRIX_NAME};
