use ndarray::{Array2, array};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use zero2ml::{Standardize, Statistics, TrainTestSplit, Vector, shuffle_data_with_rng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=zero2ml=debug shows shuffle/split/fit events
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Dataset Preparation Example ===\n");

    // Synthetic data: height (cm), weight (kg) -> label
    let x = Array2::from_shape_fn((10, 2), |(i, j)| {
        if j == 0 { 150.0 + 5.0 * i as f64 } else { 50.0 + 3.0 * i as f64 }
    });
    let y = Vector::from_shape_fn(10, |i| (i % 2) as f64);

    println!("X:\n{:?}", x);
    println!("y: {:?}", y);

    let (x_train, y_train, x_test, y_test) = TrainTestSplit::new()
        .test_size(0.3)
        .random_state(42)
        .split(&x, &y)?;

    println!("\nTrain rows: {}, test rows: {}", x_train.nrows(), x_test.nrows());
    println!("y_train: {:?}", y_train);
    println!("y_test: {:?}", y_test);

    // Fit on training data, reuse the statistics for the test set
    let mut scaler = Standardize::new();
    let x_train_norm = scaler.normalize(&x_train)?;
    let x_test_norm = scaler.transform(&x_test)?;

    println!("\nTraining mean: {:?}", scaler.mean());
    println!("Training std: {:?}", scaler.std());
    println!("Normalized train:\n{:.3}", x_train_norm);
    println!("Normalized test:\n{:.3}", x_test_norm);

    // One generator threaded through several shuffles
    let mut rng = StdRng::seed_from_u64(7);
    for epoch in 0..3 {
        let (_, y_epoch) = shuffle_data_with_rng(&x_train, &y_train, &mut rng)?;
        println!("Epoch {} label order: {:?}", epoch, y_epoch);
    }

    // Strict mode rejects constant columns
    let constant = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
    match Standardize::new().strict(true).normalize(&constant) {
        Ok(_) => println!("\nUnexpected success"),
        Err(e) => println!("\nStrict standardization failed: {}", e),
    }

    let stats = Statistics::fit(&constant)?;
    println!("Zero-variance columns: {:?}", stats.zero_variance_columns());

    Ok(())
}
