//! Seeded stratified train/test split
//!
//! Splits sample indices while preserving the label ratio per class. The
//! core pipeline explains the full dataset; the split exists for offline
//! evaluation runs that attribute the held-out portion only.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Index partition produced by [`stratified_split`]
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Errors for invalid split requests
#[derive(Debug, Clone)]
pub enum SplitError {
    /// Fraction must lie strictly between 0 and 1
    BadFraction(f64),
    /// Cannot split an empty label vector
    Empty,
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::BadFraction(v) => {
                write!(f, "test fraction must be in (0, 1), got {}", v)
            }
            SplitError::Empty => write!(f, "cannot split zero samples"),
        }
    }
}

impl std::error::Error for SplitError {}

/// Partition `0..labels.len()` into train/test indices, stratified by label
///
/// Deterministic for a fixed seed. Each class contributes
/// `floor(class_size * test_fraction)` test samples, with at least one test
/// sample per class when the class has two or more members.
pub fn stratified_split(
    labels: &[f64],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, SplitError> {
    if labels.is_empty() {
        return Err(SplitError::Empty);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::BadFraction(test_fraction));
    }

    // BTreeMap keyed on the label bit pattern keeps class iteration
    // deterministic across runs.
    let mut classes: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        classes.entry(label.to_bits()).or_default().push(idx);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut members) in classes {
        members.shuffle(&mut rng);
        let mut take = (members.len() as f64 * test_fraction).floor() as usize;
        if take == 0 && members.len() >= 2 {
            take = 1;
        }
        test.extend(members.iter().take(take));
        train.extend(members.iter().skip(take));
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}
