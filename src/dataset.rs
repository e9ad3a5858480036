//! Shuffling and train/test partitioning of paired feature/label arrays.

use crate::error::{PrepError, Result};
use crate::Matrix;
use ndarray::{Array, ArrayBase, Axis, Data, Dimension, Ix1, RemoveAxis, Slice, s};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Output of a train/test split: `(x_train, y_train, x_test, y_test)`.
pub type SplitOutput<A, D> = (Matrix, Array<A, D>, Matrix, Array<A, D>);

/// Builds a generator from an optional seed, falling back to OS entropy.
fn seeded_rng(random_state: Option<u64>) -> StdRng {
    random_state.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Checks that `x` and `y` share the sample axis and returns its length.
fn paired_len<S, D>(x: &Matrix, y: &ArrayBase<S, D>) -> Result<usize>
where
    S: Data,
    D: Dimension,
{
    if y.ndim() == 0 {
        return Err(PrepError::NoSampleAxis);
    }

    let labels = y.len_of(Axis(0));
    if x.nrows() != labels {
        return Err(PrepError::shape_mismatch(x.nrows(), labels));
    }

    Ok(labels)
}

/// Draws a uniformly random permutation of `0..n`.
pub fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Shuffles `x` and `y` in lockstep with a caller-owned generator.
///
/// Both arrays are reordered by the same permutation, so row `i` of the
/// returned features still belongs with row `i` of the returned labels.
pub fn shuffle_data_with_rng<A, S, D, R>(
    x: &Matrix,
    y: &ArrayBase<S, D>,
    rng: &mut R,
) -> Result<(Matrix, Array<A, D>)>
where
    A: Clone,
    S: Data<Elem = A>,
    D: RemoveAxis,
    R: Rng + ?Sized,
{
    let n_samples = paired_len(x, y)?;
    let indices = permutation(n_samples, rng);

    debug!(n_samples, "Shuffling paired arrays");

    Ok((x.select(Axis(0), &indices), y.select(Axis(0), &indices)))
}

/// Shuffles `x` and `y` in lockstep.
///
/// With `Some(seed)` the permutation is reproducible. With `None` it is drawn
/// from OS entropy. No global generator state is touched either way.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use zero2ml::shuffle_data;
///
/// let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
/// let y = array![1.0, 2.0, 3.0];
///
/// let (xs, ys) = shuffle_data(&x, &y, Some(7)).unwrap();
/// for (row, label) in xs.rows().into_iter().zip(ys.iter()) {
///     assert_eq!(row[0], *label);
/// }
/// ```
pub fn shuffle_data<A, S, D>(
    x: &Matrix,
    y: &ArrayBase<S, D>,
    random_state: Option<u64>,
) -> Result<(Matrix, Array<A, D>)>
where
    A: Clone,
    S: Data<Elem = A>,
    D: RemoveAxis,
{
    let mut rng = seeded_rng(random_state);
    shuffle_data_with_rng(x, y, &mut rng)
}

/// Python-style float floor division (`a // b`).
///
/// The quotient is taken from the `fmod` remainder rather than from `a / b`,
/// which differs when `b` is an inexact reciprocal: `10 // (1 / 0.3)` is 2.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && ((b < 0.0) != (rem < 0.0)) {
        div -= 1.0;
    }

    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }

    let mut floored = div.floor();
    if div - floored > 0.5 {
        floored += 1.0;
    }
    floored
}

/// Number of test rows for `n_samples` at the given `test_size`.
///
/// Computed as `n_samples // (1 / test_size)` and clamped to `0..=n_samples`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn test_count(n_samples: usize, test_size: f64) -> usize {
    let reciprocal = 1.0 / test_size;
    if !reciprocal.is_finite() || reciprocal <= 0.0 {
        return 0;
    }

    let count = floor_div(n_samples as f64, reciprocal);
    if count <= 0.0 {
        0
    } else {
        (count as usize).min(n_samples)
    }
}

/// Train/test split configuration.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use zero2ml::{TrainTestSplit, Vector};
///
/// let x = Array2::<f64>::zeros((10, 3));
/// let y = Vector::zeros(10);
///
/// let (x_train, y_train, x_test, y_test) = TrainTestSplit::new()
///     .test_size(0.2)
///     .random_state(42)
///     .split(&x, &y)
///     .unwrap();
///
/// assert_eq!(x_train.nrows(), 8);
/// assert_eq!(y_train.len(), 8);
/// assert_eq!(x_test.nrows(), 2);
/// assert_eq!(y_test.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TrainTestSplit {
    test_size: f64,
    random_state: Option<u64>,
    shuffle: bool,
}

impl TrainTestSplit {
    pub fn new() -> Self {
        Self {
            test_size: 0.2,
            random_state: None,
            shuffle: true,
        }
    }

    /// Fraction of rows assigned to the test set. Not range checked.
    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn get_test_size(&self) -> f64 {
        self.test_size
    }

    pub fn get_random_state(&self) -> Option<u64> {
        self.random_state
    }

    pub fn get_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Splits `x` and `y`, shuffling first with the configured seed.
    pub fn split<A, S, D>(&self, x: &Matrix, y: &ArrayBase<S, D>) -> Result<SplitOutput<A, D>>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: RemoveAxis,
    {
        let mut rng = seeded_rng(self.random_state);
        self.split_with_rng(x, y, &mut rng)
    }

    /// Splits `x` and `y`, shuffling with `rng`. The configured seed is ignored.
    pub fn split_with_rng<A, S, D, R>(
        &self,
        x: &Matrix,
        y: &ArrayBase<S, D>,
        rng: &mut R,
    ) -> Result<SplitOutput<A, D>>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: RemoveAxis,
        R: Rng + ?Sized,
    {
        paired_len(x, y)?;

        if self.shuffle {
            let (x, y) = shuffle_data_with_rng(x, y, rng)?;
            Ok(self.partition(&x, &y))
        } else {
            Ok(self.partition(x, y))
        }
    }

    fn partition<A, S, D>(&self, x: &Matrix, y: &ArrayBase<S, D>) -> SplitOutput<A, D>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: RemoveAxis,
    {
        let n_samples = x.nrows();
        let n_test = test_count(n_samples, self.test_size);
        let split_index = n_samples - n_test;

        debug!(
            n_samples,
            n_train = split_index,
            n_test,
            shuffled = self.shuffle,
            "Splitting into train and test sets"
        );

        (
            x.slice(s![..split_index, ..]).to_owned(),
            y.slice_axis(Axis(0), Slice::from(..split_index)).to_owned(),
            x.slice(s![split_index.., ..]).to_owned(),
            y.slice_axis(Axis(0), Slice::from(split_index..)).to_owned(),
        )
    }
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `x` and `y` into `(x_train, y_train, x_test, y_test)`.
///
/// Shorthand for configuring a [`TrainTestSplit`] and calling `split`.
pub fn train_test_split<A, S, D>(
    x: &Matrix,
    y: &ArrayBase<S, D>,
    test_size: f64,
    random_state: Option<u64>,
    shuffle: bool,
) -> Result<SplitOutput<A, D>>
where
    A: Clone,
    S: Data<Elem = A>,
    D: RemoveAxis,
{
    let splitter = TrainTestSplit {
        test_size,
        random_state,
        shuffle,
    };
    splitter.split(x, y)
}

/// Feature matrix paired with a row-aligned label array.
#[derive(Clone, Debug)]
pub struct Dataset<D: Dimension = Ix1> {
    pub features: Matrix,
    pub labels: Array<f64, D>,
}

impl<D: RemoveAxis> Dataset<D> {
    pub fn new(features: Matrix, labels: Array<f64, D>) -> Result<Self> {
        paired_len(&features, &labels)?;
        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Returns a copy with rows permuted by `rng`.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let indices = permutation(self.n_samples(), rng);
        Self {
            features: self.features.select(Axis(0), &indices),
            labels: self.labels.select(Axis(0), &indices),
        }
    }

    pub fn train_test_split(&self, splitter: &TrainTestSplit) -> Result<(Self, Self)> {
        let (x_train, y_train, x_test, y_test) = splitter.split(&self.features, &self.labels)?;
        Ok((
            Self {
                features: x_train,
                labels: y_train,
            },
            Self {
                features: x_test,
                labels: y_test,
            },
        ))
    }

    pub fn into_parts(self) -> (Matrix, Array<f64, D>) {
        (self.features, self.labels)
    }
}
