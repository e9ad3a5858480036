use crate::error::{PrepError, Result};
use crate::{Matrix, Vector};
use ndarray::Axis;
use tracing::{debug, warn};

/// Per-column mean and population standard deviation.
///
/// Fitted once on reference data and applied to any matrix with the same
/// number of columns, so training statistics can be reused on test data.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    mean: Vector,
    std: Vector,
}

impl Statistics {
    pub fn fit(data: &Matrix) -> Result<Self> {
        let mean = data.mean_axis(Axis(0)).ok_or(PrepError::EmptyInput)?;
        let std = data.std_axis(Axis(0), 0.0);

        debug!(n_samples = data.nrows(), n_features = data.ncols(), "Fitted column statistics");

        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> &Vector {
        &self.mean
    }

    pub fn std(&self) -> &Vector {
        &self.std
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn zero_variance_columns(&self) -> Vec<usize> {
        self.std
            .iter()
            .enumerate()
            .filter(|&(_, &sigma)| sigma == 0.0)
            .map(|(j, _)| j)
            .collect()
    }

    /// Returns `(data - mean) / std` row by row.
    ///
    /// Zero-variance columns come out as NaN or infinite.
    pub fn apply(&self, data: &Matrix) -> Result<Matrix> {
        self.check_features(data)?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= &self.mean;
            row /= &self.std;
        }

        Ok(result)
    }

    /// Maps standardized values back to the original scale.
    pub fn invert(&self, data: &Matrix) -> Result<Matrix> {
        self.check_features(data)?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row *= &self.std;
            row += &self.mean;
        }

        Ok(result)
    }

    fn check_features(&self, data: &Matrix) -> Result<()> {
        if data.ncols() != self.n_features() {
            return Err(PrepError::feature_mismatch(self.n_features(), data.ncols()));
        }
        Ok(())
    }
}

/// Z-score normalization that refits on every call to [`Standardize::normalize`].
///
/// The statistics from the most recent fit stay readable through
/// [`Standardize::mean`] and [`Standardize::std`], and can be reused on other
/// data with [`Standardize::transform`].
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use zero2ml::Standardize;
///
/// let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
///
/// let mut scaler = Standardize::new();
/// let normalized = scaler.normalize(&x).unwrap();
///
/// assert_eq!(scaler.mean().unwrap(), &array![2.0, 20.0]);
/// assert!(normalized[[1, 0]].abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Standardize {
    statistics: Option<Statistics>,
    strict: bool,
}

impl Standardize {
    pub fn new() -> Self {
        Self {
            statistics: None,
            strict: false,
        }
    }

    /// Reject zero-variance columns instead of producing non-finite output.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.statistics.as_ref().map(Statistics::mean)
    }

    pub fn std(&self) -> Option<&Vector> {
        self.statistics.as_ref().map(Statistics::std)
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    /// Fits on `data` and replaces any stored statistics.
    ///
    /// In strict mode a zero-variance column fails the fit and leaves the
    /// previous statistics in place.
    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        let statistics = Statistics::fit(data)?;

        let constant = statistics.zero_variance_columns();
        if let Some(&column) = constant.first() {
            if self.strict {
                return Err(PrepError::zero_variance(column));
            }
            warn!(columns = ?constant, "Zero-variance columns will standardize to non-finite values");
        }

        self.statistics = Some(statistics);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        self.statistics
            .as_ref()
            .ok_or(PrepError::NotFitted)?
            .apply(data)
    }

    pub fn inverse_transform(&self, data: &Matrix) -> Result<Matrix> {
        self.statistics
            .as_ref()
            .ok_or(PrepError::NotFitted)?
            .invert(data)
    }

    /// Fits on `data` and returns it standardized.
    pub fn normalize(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand_distr::Uniform;

    #[test]
    fn test_standardize_unit_columns() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let mut scaler = Standardize::new();

        let scaled = scaler.normalize(&data).unwrap();
        assert_eq!(scaled.shape(), data.shape());

        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);
        assert_abs_diff_eq!(mean, array![0.0, 0.0], epsilon = 1e-12);
        assert_abs_diff_eq!(std, array![1.0, 1.0], epsilon = 1e-12);
    }

    #[test]
    fn test_population_std() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let mut scaler = Standardize::new();
        scaler.normalize(&data).unwrap();

        let expected = (2.0_f64 / 3.0).sqrt();
        assert_abs_diff_eq!(scaler.std().unwrap()[0], expected, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.std().unwrap()[1], expected * 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            scaler.normalize(&data).unwrap()[[0, 0]],
            -1.0 / expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_unset_before_first_call() {
        let scaler = Standardize::new();
        assert!(scaler.mean().is_none());
        assert!(scaler.std().is_none());
        assert_eq!(
            scaler.transform(&array![[1.0]]).unwrap_err(),
            PrepError::NotFitted
        );
    }

    #[test]
    fn test_second_call_overwrites() {
        let mut scaler = Standardize::new();
        scaler.normalize(&array![[1.0], [3.0]]).unwrap();
        scaler.normalize(&array![[100.0], [104.0]]).unwrap();

        assert_eq!(scaler.mean().unwrap(), &array![102.0]);
        assert_eq!(scaler.std().unwrap(), &array![2.0]);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = Standardize::new();
        let mut second = Standardize::new();

        first.normalize(&array![[0.0, 1.0], [2.0, 3.0]]).unwrap();
        second.normalize(&array![[10.0, 10.0], [30.0, 50.0]]).unwrap();

        assert_eq!(first.mean().unwrap(), &array![1.0, 2.0]);
        assert_eq!(second.mean().unwrap(), &array![20.0, 30.0]);
    }

    #[test]
    fn test_transform_reuses_training_statistics() {
        let mut scaler = Standardize::new();
        scaler.normalize(&array![[0.0], [2.0]]).unwrap();

        let test = scaler.transform(&array![[4.0], [1.0]]).unwrap();
        assert_abs_diff_eq!(test, array![[3.0], [0.0]], epsilon = 1e-12);
        assert_eq!(scaler.mean().unwrap(), &array![1.0]);
    }

    #[test]
    fn test_zero_variance_is_non_finite_by_default() {
        let data = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let mut scaler = Standardize::new();
        let scaled = scaler.normalize(&data).unwrap();

        assert!(scaled.column(0).iter().all(|v| v.is_finite()));
        assert!(scaled.column(1).iter().all(|v| !v.is_finite()));
    }

    #[test]
    fn test_zero_variance_strict() {
        let mut scaler = Standardize::new().strict(true);
        scaler.normalize(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();

        let err = scaler.normalize(&array![[1.0, 5.0], [2.0, 5.0]]).unwrap_err();
        assert_eq!(err, PrepError::zero_variance(1));
        assert_eq!(scaler.mean().unwrap(), &array![2.0, 3.0]);
    }

    #[test]
    fn test_empty_input() {
        let data = Matrix::zeros((0, 3));
        let mut scaler = Standardize::new();
        assert_eq!(scaler.normalize(&data).unwrap_err(), PrepError::EmptyInput);
    }

    #[test]
    fn test_feature_mismatch() {
        let stats = Statistics::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = stats.apply(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert_eq!(err, PrepError::feature_mismatch(2, 3));
    }

    #[test]
    fn test_invert_restores_data() {
        let mut rng = StdRng::seed_from_u64(17);
        let data = Matrix::random_using((25, 4), Uniform::new(-50.0, 50.0), &mut rng);

        let mut scaler = Standardize::new();
        let scaled = scaler.normalize(&data).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();

        assert_abs_diff_eq!(restored, data, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_variance_columns() {
        let stats = Statistics::fit(&array![[1.0, 0.0, 2.0], [1.0, 1.0, 2.0]]).unwrap();
        assert_eq!(stats.zero_variance_columns(), vec![0, 2]);
        assert_eq!(stats.n_features(), 3);
    }
}
