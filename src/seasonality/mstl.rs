//! Iterative multi-frequency STL.
//!
//! Runs one complete STL decomposition per stage, feeding the seasonally
//! adjusted output of a stage into the next one. Stages keep their own loop
//! counts and smoothers, unlike a single multi-season [`StlSpec`] where all
//! components share the inner and outer loops.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::composition::Composition;
use super::result::Decomposition;
use super::spec::StlSpec;
use super::stl::StlKernel;
use crate::error::{Result, StlError};

/// Decompose `series` with one STL stage per spec, in the given order.
pub fn decompose_iterative(series: &[f64], stages: &[StlSpec]) -> Result<Decomposition> {
    IterativeStl::new(stages.to_vec())?.decompose(series)
}

/// Chain of STL kernels applied one frequency at a time.
#[derive(Debug, Clone)]
pub struct IterativeStl {
    composition: Composition,
    stages: Vec<StlKernel>,
}

impl IterativeStl {
    /// Build the chain. All stages must share one composition and no period
    /// may appear in two stages.
    pub fn new(stages: Vec<StlSpec>) -> Result<Self> {
        let first = stages.first().ok_or(StlError::NoSeasonalSpec)?;
        let composition = first.composition();

        let mut seen = HashSet::new();
        for spec in &stages {
            if spec.composition() != composition {
                return Err(StlError::MixedComposition);
            }
            for period in spec.periods() {
                if !seen.insert(period) {
                    return Err(StlError::DuplicatePeriod(period));
                }
            }
        }

        Ok(Self {
            composition,
            stages: stages.into_iter().map(StlKernel::new).collect(),
        })
    }

    /// Additive chain with one default stage per period, shortest period
    /// first. Repeated periods are collapsed.
    pub fn from_periods(periods: &[usize], seasonal_window: usize) -> Result<Self> {
        let mut periods = periods.to_vec();
        periods.sort();
        periods.dedup();

        let stages = periods
            .into_iter()
            .map(|p| StlSpec::for_period(p, seasonal_window))
            .collect::<Result<Vec<_>>>()?;
        Self::new(stages)
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    /// Stage specifications in execution order.
    pub fn stages(&self) -> impl Iterator<Item = &StlSpec> {
        self.stages.iter().map(StlKernel::spec)
    }

    /// Periods of every stage, in execution order.
    pub fn periods(&self) -> Vec<usize> {
        self.stages().flat_map(StlSpec::periods).collect()
    }

    /// Run every stage. The trend and robustness weights are those of the
    /// last stage; the seasonal components of all stages are kept in stage
    /// order.
    #[instrument(skip_all, fields(n = series.len(), stages = self.stages.len()))]
    pub fn decompose(&self, series: &[f64]) -> Result<Decomposition> {
        if series.is_empty() {
            return Err(StlError::EmptyData);
        }
        let longest = self
            .stages()
            .map(StlSpec::max_period)
            .max()
            .unwrap_or(0);
        if series.len() < 2 * longest {
            return Err(StlError::InsufficientData {
                needed: 2 * longest,
                got: series.len(),
            });
        }

        let mut input = series.to_vec();
        let mut seasons = Vec::new();
        let mut last = None;
        for (index, kernel) in self.stages.iter().enumerate() {
            debug!(stage = index, periods = ?kernel.spec().periods(), "running stage");
            let stage = kernel.decompose(&input)?;
            input = stage.sa().to_vec();
            seasons.extend(stage.seasons().iter().cloned());
            last = Some(stage);
        }

        let last = last.ok_or(StlError::NoSeasonalSpec)?;
        Ok(Decomposition::assemble(
            self.composition,
            series.to_vec(),
            last.trend().to_vec(),
            seasons,
            last.weights().to_vec(),
        ))
    }
}
