//! Uniform random selection helpers.
//!
//! All functions take the random source explicitly so callers decide how it is
//! seeded: from entropy when serving requests, from a fixed seed in tests.
//! Uniformity is what matters here; cryptographic unpredictability is not
//! required.

use rand::Rng;

/// Pick one element uniformly at random. `None` for an empty slice.
pub fn choose<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
  R: Rng + ?Sized,
{
  if items.is_empty() {
    return None;
  }
  items.get(rng.gen_range(0..items.len()))
}

/// Fisher–Yates shuffle in place: walk from the last slot to the second,
/// swapping each with a uniformly drawn slot at or before it.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
  R: Rng + ?Sized,
{
  for i in (1..items.len()).rev() {
    let j = rng.gen_range(0..=i);
    items.swap(i, j);
  }
}

/// Draw `n` distinct elements uniformly without replacement.
///
/// Runs the first `n` steps of a forward Fisher–Yates pass, so the cost is
/// `O(n)` swaps regardless of how many candidates there are. Returns `None`
/// when fewer than `n` candidates are available.
pub fn sample_distinct<T, R>(mut items: Vec<T>, n: usize, rng: &mut R) -> Option<Vec<T>>
where
  R: Rng + ?Sized,
{
  if items.len() < n {
    return None;
  }
  for i in 0..n {
    let j = rng.gen_range(i..items.len());
    items.swap(i, j);
  }
  items.truncate(n);
  Some(items)
}
