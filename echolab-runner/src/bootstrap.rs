//! Block bootstrap engine.
//!
//! Converts a conditional return set into a simulated distribution of
//! multi-step forward outcomes. Each trial draws `horizon` values
//! independently, with replacement, uniformly from the set; the draws are
//! summed (additive in log space) and mapped to a percentage change via
//! `exp(x) − 1`.
//!
//! Trials are independent, so they run on the rayon pool. Each trial seeds
//! its own `StdRng` from a hash-derived sub-seed, which keeps the output
//! identical under any thread schedule for a fixed master seed.

use echolab_core::rng::SeedHierarchy;
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

/// Errors from the bootstrap engine.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(
        "not enough samples for simulation (got {got}, need {need}) — \
         try widening the band or extending the date range"
    )]
    InsufficientSamples { got: usize, need: usize },
}

/// Run the bootstrap: `n_sims` simulated percentage changes.
///
/// `cond_returns` holds log-return labels. `context` partitions the seed
/// stream (one context per evaluated band) so sweep bands don't share
/// draws. Fails if the set holds fewer than `min_samples` observations.
pub fn simulate_pct_changes(
    cond_returns: &[f64],
    n_sims: usize,
    horizon: usize,
    min_samples: usize,
    seeds: &SeedHierarchy,
    context: &str,
) -> Result<Vec<f64>, BootstrapError> {
    if cond_returns.len() < min_samples {
        return Err(BootstrapError::InsufficientSamples {
            got: cond_returns.len(),
            need: min_samples,
        });
    }

    let simulated: Vec<f64> = (0..n_sims)
        .into_par_iter()
        .map(|trial| {
            let mut rng = seeds.rng_for(context, trial as u64);
            let mut log_sum = 0.0;
            for _ in 0..horizon {
                log_sum += cond_returns[rng.gen_range(0..cond_returns.len())];
            }
            log_sum.exp() - 1.0
        })
        .collect();

    Ok(simulated)
}
