// ============================================================
// Layer 4 — Seeded Train/Test Splitter
// ============================================================
// Splits a list of samples into (train, test) with a fixed seed,
// optionally stratified by a per-sample class key.
//
// Sizes:
//   n_test  = ceil(test_size * n)
//   n_train = n - n_test
//   Both must be non-zero, otherwise the split is refused.
//
// Unstratified:
//   Shuffle the indices 0..n with StdRng::seed_from_u64(seed).
//   The first n_test indices go to test, the rest to train,
//   both in shuffled order.
//
// Stratified:
//   Every class needs at least 2 members, and each side needs at
//   least one slot per class. n_test is shared out across classes
//   in proportion to class size (largest remainder first), each
//   class is shuffled and cut, and both sides are shuffled again
//   so classes are interleaved.
//
// The same seed and input always give the same split.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::error::{PrepError, PrepResult};

/// Seed used by every split unless the caller overrides it
pub const DEFAULT_SEED: u64 = 42;

/// Split `samples` into (train, test).
///
/// # Arguments
/// * `samples`   - All samples (consumed)
/// * `test_size` - Fraction for the test side, in (0, 1)
/// * `stratify`  - Optional class key per sample, same length as `samples`
/// * `seed`      - RNG seed
pub fn train_test_split<T, K>(
    samples:   Vec<T>,
    test_size: f64,
    stratify:  Option<&[K]>,
    seed:      u64,
) -> PrepResult<(Vec<T>, Vec<T>)>
where
    K: Ord + Clone,
{
    let total = samples.len();
    if total == 0 {
        return Err(PrepError::Sampler("cannot split an empty set of samples".into()));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PrepError::Sampler(format!("test_size must be in (0, 1), got {test_size}")));
    }

    let n_test  = ((total as f64) * test_size).ceil() as usize;
    let n_train = total.saturating_sub(n_test);
    if n_train == 0 || n_test == 0 {
        return Err(PrepError::Sampler(format!(
            "with n_samples={total} and test_size={test_size} one side of the split would be empty"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let (train_idx, test_idx) = match stratify {
        None       => shuffled_split(total, n_test, &mut rng),
        Some(keys) => stratified_split(keys, total, n_train, n_test, &mut rng)?,
    };

    tracing::debug!(
        "Split {} samples: {} train, {} test (stratified: {})",
        total,
        train_idx.len(),
        test_idx.len(),
        stratify.is_some(),
    );

    let mut slots: Vec<Option<T>> = samples.into_iter().map(Some).collect();
    let train = take_all(&mut slots, &train_idx);
    let test  = take_all(&mut slots, &test_idx);
    Ok((train, test))
}

fn shuffled_split(total: usize, n_test: usize, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..total).collect();
    order.shuffle(rng);
    let train = order.split_off(n_test);
    (train, order)
}

fn stratified_split<K: Ord + Clone>(
    keys:    &[K],
    total:   usize,
    n_train: usize,
    n_test:  usize,
    rng:     &mut StdRng,
) -> PrepResult<(Vec<usize>, Vec<usize>)> {
    if keys.len() != total {
        return Err(PrepError::Sampler(format!(
            "stratify has {} keys for {} samples",
            keys.len(),
            total
        )));
    }

    // Group sample indices by class; BTreeMap keeps class order stable
    let mut classes: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        classes.entry(k.clone()).or_default().push(i);
    }

    let smallest = classes.values().map(Vec::len).min().unwrap_or(0);
    if smallest < 2 {
        return Err(PrepError::Sampler(
            "the least populated class has only 1 member; every class needs at least 2".into(),
        ));
    }
    if n_test < classes.len() || n_train < classes.len() {
        return Err(PrepError::Sampler(format!(
            "train size {n_train} and test size {n_test} must each be at least the number of classes ({})",
            classes.len()
        )));
    }

    let sizes: Vec<usize> = classes.values().map(Vec::len).collect();
    let quotas = allocate(&sizes, n_test);

    let mut train = Vec::with_capacity(n_train);
    let mut test  = Vec::with_capacity(n_test);
    for (mut members, quota) in classes.into_values().zip(quotas) {
        members.shuffle(rng);
        let rest = members.split_off(quota);
        test.extend(members);
        train.extend(rest);
    }

    train.shuffle(rng);
    test.shuffle(rng);
    Ok((train, test))
}

/// Share `n` slots across classes of the given sizes, proportional to
/// size, handing leftovers to the largest fractional remainders. No
/// class gets all of its members.
fn allocate(sizes: &[usize], n: usize) -> Vec<usize> {
    let total: usize = sizes.iter().sum();
    let exact: Vec<f64> = sizes
        .iter()
        .map(|&s| s as f64 * n as f64 / total as f64)
        .collect();

    let mut quotas: Vec<usize> = exact
        .iter()
        .zip(sizes)
        .map(|(&e, &s)| (e.floor() as usize).min(s - 1))
        .collect();

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut left = n.saturating_sub(quotas.iter().sum());
    while left > 0 {
        let before = left;
        for &i in &order {
            if left == 0 {
                break;
            }
            if quotas[i] + 1 < sizes[i] {
                quotas[i] += 1;
                left -= 1;
            }
        }
        if left == before {
            break;
        }
    }

    quotas
}

fn take_all<T>(slots: &mut [Option<T>], idx: &[usize]) -> Vec<T> {
    idx.iter().filter_map(|&i| slots[i].take()).collect()
}
