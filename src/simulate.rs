use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::disjoint_set::{checked_size, DisjointSet};
use crate::error::UnionFindError;

/// Source of random sites for a trial.
pub trait SitePicker {
    /// Returns a site in `[0, n)`. `n` is at least 2.
    fn pick(&mut self, n: usize) -> usize;
}

impl<R: Rng> SitePicker for R {
    fn pick(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Connects random pairs of `[0, n)` until one component is left and returns
/// the number of pairs drawn, including pairs that were already connected.
///
/// `n` must be the size of `disjoint_set`. A universe of 0 or 1 sites is
/// already complete, so no pair is drawn.
pub fn run_trial<S: SitePicker + ?Sized>(
    disjoint_set: &mut DisjointSet,
    n: usize,
    picker: &mut S,
) -> Result<u64, UnionFindError> {
    if n != disjoint_set.size() {
        return Err(UnionFindError::SizeMismatch {
            trial: n,
            size: disjoint_set.size(),
        });
    }
    if n <= 1 {
        return Ok(0);
    }

    let mut attempts = 0;
    while disjoint_set.components() > 1 {
        let p = picker.pick(n);
        let q = picker.pick(n);
        disjoint_set.connect(p, q)?;
        attempts += 1;
    }
    Ok(attempts)
}

/// Runs a number of independent trials over a fixed number of sites.
#[derive(Debug, Clone)]
pub struct ConnectivitySimulator {
    sites: usize,
    trials: usize,
}

impl ConnectivitySimulator {
    pub fn new(sites: usize, trials: usize) -> Self {
        Self { sites, trials }
    }

    /// Same as [`ConnectivitySimulator::new`], for a site count coming from signed input.
    pub fn try_new(sites: i64, trials: usize) -> Result<Self, UnionFindError> {
        Ok(Self::new(checked_size(sites)?, trials))
    }

    pub fn sites(&self) -> usize {
        self.sites
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Runs the trials one after another, all drawing from `picker`.
    pub fn run<S: SitePicker + ?Sized>(
        &self,
        picker: &mut S,
    ) -> Result<TrialSummary, UnionFindError> {
        let attempts = (0..self.trials)
            .map(|trial| self.run_one(trial, &mut *picker))
            .collect::<Result<Vec<u64>, UnionFindError>>()?;
        Ok(TrialSummary { attempts })
    }

    /// Runs the trials on the rayon pool. Trial `k` draws from its own
    /// generator seeded with `seed + k`, so the result does not depend on
    /// scheduling.
    pub fn run_parallel(&self, seed: u64) -> Result<TrialSummary, UnionFindError> {
        let attempts = (0..self.trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
                self.run_one(trial, &mut rng)
            })
            .collect::<Result<Vec<u64>, UnionFindError>>()?;
        Ok(TrialSummary { attempts })
    }

    fn run_one<S: SitePicker + ?Sized>(
        &self,
        trial: usize,
        picker: &mut S,
    ) -> Result<u64, UnionFindError> {
        debug!("trial {} started with {} sites", trial, self.sites);
        let mut disjoint_set = DisjointSet::new(self.sites);
        let attempts = run_trial(&mut disjoint_set, self.sites, picker)?;
        debug!("trial {} finished after {} attempts", trial, attempts);
        Ok(attempts)
    }
}

/// Attempt counts of every trial, in trial order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSummary {
    attempts: Vec<u64>,
}

impl TrialSummary {
    pub fn attempts(&self) -> &[u64] {
        &self.attempts
    }

    /// Integer-divided mean, `None` without trials.
    pub fn average(&self) -> Option<u64> {
        if self.attempts.is_empty() {
            return None;
        }
        let total: u128 = self.attempts.iter().map(|&attempts| u128::from(attempts)).sum();
        // the mean never exceeds the largest count, so it fits back into u64
        Some((total / self.attempts.len() as u128) as u64)
    }

    pub fn min(&self) -> Option<u64> {
        self.attempts.iter().copied().min()
    }

    pub fn max(&self) -> Option<u64> {
        self.attempts.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Replays fixed sites, wrapping around at the end.
    struct Scripted {
        sites: Vec<usize>,
        next: usize,
        drawn: usize,
    }

    impl Scripted {
        fn new(sites: Vec<usize>) -> Self {
            Scripted {
                sites,
                next: 0,
                drawn: 0,
            }
        }
    }

    impl SitePicker for Scripted {
        fn pick(&mut self, _n: usize) -> usize {
            let site = self.sites[self.next % self.sites.len()];
            self.next += 1;
            self.drawn += 1;
            site
        }
    }

    #[test]
    fn test_trivial_universes_draw_nothing() {
        let mut picker = Scripted::new(vec![0]);

        let mut empty = DisjointSet::new(0);
        assert_eq!(run_trial(&mut empty, 0, &mut picker), Ok(0));
        assert_eq!(empty.components(), 0);

        let mut single = DisjointSet::new(1);
        assert_eq!(run_trial(&mut single, 1, &mut picker), Ok(0));
        assert_eq!(single.components(), 1);

        assert_eq!(picker.drawn, 0);
    }

    #[test]
    fn test_scripted_trial_counts_wasted_draws() {
        // (0,0) self pair, (0,1) merge, (1,0) already connected, (2,1) merge
        let mut picker = Scripted::new(vec![0, 0, 0, 1, 1, 0, 2, 1]);
        let mut ds = DisjointSet::new(3);
        assert_eq!(run_trial(&mut ds, 3, &mut picker), Ok(4));
        assert_eq!(ds.components(), 1);
        assert_eq!(picker.drawn, 8);
    }

    #[test]
    fn test_trial_rejects_mismatched_universe() {
        let mut picker = Scripted::new(vec![0, 1]);
        let mut ds = DisjointSet::new(3);

        assert_eq!(
            run_trial(&mut ds, 5, &mut picker),
            Err(UnionFindError::SizeMismatch { trial: 5, size: 3 })
        );
        // sites 0 and 1 alone could never join site 2
        assert_eq!(
            run_trial(&mut ds, 2, &mut picker),
            Err(UnionFindError::SizeMismatch { trial: 2, size: 3 })
        );
        // a one-site universe is not complete when the set holds three
        assert_eq!(
            run_trial(&mut ds, 1, &mut picker),
            Err(UnionFindError::SizeMismatch { trial: 1, size: 3 })
        );
        assert_eq!(
            run_trial(&mut DisjointSet::new(1), 0, &mut picker),
            Err(UnionFindError::SizeMismatch { trial: 0, size: 1 })
        );

        assert_eq!(picker.drawn, 0);
        assert_eq!(ds.components(), 3);
    }

    #[test]
    fn test_simulator_try_new() {
        let simulator = ConnectivitySimulator::try_new(12, 3).unwrap();
        assert_eq!(simulator.sites(), 12);
        assert_eq!(simulator.trials(), 3);
        assert_eq!(
            ConnectivitySimulator::try_new(-3, 5).unwrap_err(),
            UnionFindError::InvalidSize(-3)
        );
    }

    #[test]
    fn test_random_trials_collapse_to_one_component() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..40 {
            let mut ds = DisjointSet::new(n);
            let attempts = run_trial(&mut ds, n, &mut rng).unwrap();
            assert!(attempts >= (n - 1) as u64);
            assert_eq!(ds.components(), 1);
            assert_eq!(ds.groups().len(), 1);
        }
    }

    #[test]
    fn test_simulator_run() {
        let simulator = ConnectivitySimulator::new(50, 5);
        let mut rng = StdRng::seed_from_u64(2024);
        let summary = simulator.run(&mut rng).unwrap();
        assert_eq!(summary.attempts().len(), 5);

        let average = summary.average().unwrap();
        assert!(summary.min().unwrap() <= average);
        assert!(average <= summary.max().unwrap());
        assert!(summary.min().unwrap() >= 49);
    }

    #[test]
    fn test_parallel_run_is_reproducible() {
        let simulator = ConnectivitySimulator::new(64, 8);
        let first = simulator.run_parallel(11).unwrap();
        let second = simulator.run_parallel(11).unwrap();
        assert_eq!(first, second);

        // trial k uses seed + k
        let mut rng = StdRng::seed_from_u64(13);
        let mut ds = DisjointSet::new(64);
        let expected = run_trial(&mut ds, 64, &mut rng).unwrap();
        assert_eq!(first.attempts()[2], expected);
    }

    #[test]
    fn test_summary_without_trials() {
        let summary = ConnectivitySimulator::new(10, 0).run_parallel(0).unwrap();
        assert!(summary.attempts().is_empty());
        assert_eq!(summary.average(), None);
        assert_eq!(summary.min(), None);
    }

    #[test]
    fn test_average_is_integer_divided() {
        let summary = TrialSummary {
            attempts: vec![3, 4, 4],
        };
        assert_eq!(summary.average(), Some(3));

        let huge = TrialSummary {
            attempts: vec![u64::MAX, u64::MAX - 2],
        };
        assert_eq!(huge.average(), Some(u64::MAX - 1));
    }
}
