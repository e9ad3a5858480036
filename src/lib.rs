//! Dataset preparation helpers for in-memory numeric tables.
//!
//! - [`shuffle_data`]: permute features and labels in lockstep
//! - [`train_test_split`] / [`TrainTestSplit`]: partition into train and test rows
//! - [`Standardize`] / [`Statistics`]: per-column Z-score normalization
//!
//! Randomness is always either seeded per call or drawn from a generator the
//! caller owns; nothing here touches global state.
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use zero2ml::{Standardize, TrainTestSplit};
//!
//! let x = array![
//!     [1.0, 200.0],
//!     [2.0, 180.0],
//!     [3.0, 240.0],
//!     [4.0, 210.0],
//!     [5.0, 190.0]
//! ];
//! let y = array![0.0, 1.0, 0.0, 1.0, 1.0];
//!
//! let (x_train, _y_train, x_test, _y_test) = TrainTestSplit::new()
//!     .test_size(0.2)
//!     .random_state(42)
//!     .split(&x, &y)
//!     .unwrap();
//!
//! let mut scaler = Standardize::new();
//! let x_train = scaler.normalize(&x_train).unwrap();
//! let x_test = scaler.transform(&x_test).unwrap();
//!
//! assert_eq!(x_train.nrows(), 4);
//! assert_eq!(x_test.nrows(), 1);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod preprocessing;

pub use dataset::{
    Dataset, SplitOutput, TrainTestSplit, permutation, shuffle_data, shuffle_data_with_rng,
    test_count, train_test_split,
};
pub use error::{PrepError, Result};
pub use preprocessing::{Standardize, Statistics};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
