use std::time::Instant;

use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    error::{ProcessorError, Result},
    model::{
        constants::{CONTRACTION, EXPANSION, OPTIMIZER_TOLERANCE, REFLECTION, SHRINK},
        prediction::PredictionHarness,
        structures::{model_config::ModelConfig, search_space::SearchSpace}
    },
    utils::progress_utils::progress_bar_spinner
};

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub best: Vec<f64>,
    pub score: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool
}

#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64
}

/// Derivative-free Nelder-Mead simplex search.
///
/// Every trial point goes through `project` before it is evaluated, so the objective
/// only ever sees points inside the valid domain.
pub struct NelderMead<F, P>
where
    F: FnMut(&[f64]) -> Result<f64>,
    P: Fn(&mut [f64])
{
    objective: F,
    project: P,
    max_iterations: usize,
    tolerance: f64,
    evaluations: usize
}

impl<F, P> NelderMead<F, P>
where
    F: FnMut(&[f64]) -> Result<f64>,
    P: Fn(&mut [f64])
{
    pub fn new(objective: F, project: P, max_iterations: usize) -> NelderMead<F, P> {
        NelderMead {
            objective,
            project,
            max_iterations,
            tolerance: OPTIMIZER_TOLERANCE,
            evaluations: 0
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> NelderMead<F, P> {
        self.tolerance = tolerance;
        self
    }

    /// Minimizes the objective starting from `start`, which needs `n + 1` points of length `n`.
    pub fn minimize(mut self, start: Vec<Vec<f64>>) -> Result<OptimizationResult> {
        Self::validate(&start)?;

        let mut simplex = start
            .into_iter()
            .map(|point| self.vertex(point))
            .collect::<Result<Vec<Vertex>>>()?;

        let mut iterations = 0;
        let mut converged = false;
        loop {
            simplex.sort_by(|a, b| a.value.total_cmp(&b.value));

            let spread = simplex[simplex.len() - 1].value - simplex[0].value;
            if spread.abs() < self.tolerance {
                converged = true;
                break;
            }

            if iterations >= self.max_iterations {
                break;
            }
            iterations += 1;

            self.step(&mut simplex)?;
            debug!(iteration = iterations, best = simplex[0].value, "Nelder-Mead step");
        }

        simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
        let best = simplex.swap_remove(0);

        Ok(OptimizationResult {
            best: best.point,
            score: best.value,
            iterations,
            evaluations: self.evaluations,
            converged
        })
    }

    fn validate(start: &[Vec<f64>]) -> Result<()> {
        let n = start.first().map(|p| p.len()).unwrap_or(0);

        if n == 0 || start.len() != n + 1 || start.iter().any(|p| p.len() != n) {
            return Err(ProcessorError::Configuration(format!(
                "a start simplex needs n + 1 points of dimension n >= 1, got {} points of dimensions {:?}",
                start.len(),
                start.iter().map(|p| p.len()).collect_vec()
            )));
        }

        if start.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ProcessorError::Configuration(
                "start simplex contains non-finite values".to_string()
            ));
        }

        Ok(())
    }

    /// Replaces the worst vertex of a sorted simplex, or shrinks towards the best one.
    fn step(&mut self, simplex: &mut [Vertex]) -> Result<()> {
        let worst = simplex.len() - 1;
        let centroid = centroid(&simplex[..worst]);

        let reflected = self.vertex(along(&centroid, &simplex[worst].point, -REFLECTION))?;

        if reflected.value < simplex[0].value {
            let expanded = self.vertex(along(&centroid, &reflected.point, EXPANSION))?;
            simplex[worst] = if expanded.value < reflected.value { expanded } else { reflected };
            return Ok(());
        }

        if reflected.value < simplex[worst - 1].value {
            simplex[worst] = reflected;
            return Ok(());
        }

        let contracted = if reflected.value < simplex[worst].value {
            // Outside contraction
            let contracted = self.vertex(along(&centroid, &reflected.point, CONTRACTION))?;
            (contracted.value <= reflected.value).then_some(contracted)
        } else {
            // Inside contraction
            let contracted = self.vertex(along(&centroid, &simplex[worst].point, CONTRACTION))?;
            (contracted.value < simplex[worst].value).then_some(contracted)
        };

        match contracted {
            Some(vertex) => simplex[worst] = vertex,
            None => self.shrink(simplex)?
        }

        Ok(())
    }

    fn shrink(&mut self, simplex: &mut [Vertex]) -> Result<()> {
        let best = simplex[0].point.clone();

        for vertex in simplex.iter_mut().skip(1) {
            *vertex = self.vertex(along(&best, &vertex.point, SHRINK))?;
        }

        Ok(())
    }

    fn vertex(&mut self, mut point: Vec<f64>) -> Result<Vertex> {
        (self.project)(&mut point);
        let value = (self.objective)(&point)?;
        self.evaluations += 1;

        Ok(Vertex { point, value })
    }
}

/// Mean of the given vertices.
fn centroid(vertices: &[Vertex]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dimensions = vertices[0].point.len();

    (0..dimensions)
        .map(|d| vertices.iter().map(|v| v.point[d]).sum::<f64>() / n)
        .collect()
}

/// `origin + coefficient * (towards - origin)`
fn along(origin: &[f64], towards: &[f64], coefficient: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(towards)
        .map(|(o, t)| o + coefficient * (t - o))
        .collect()
}

/// Tunes the hyperparameters of `space` against the harness's prediction score.
///
/// Values outside `space` are taken from `base`.
pub fn optimize(
    harness: &PredictionHarness,
    base: &ModelConfig,
    space: SearchSpace,
    max_iterations: usize
) -> Result<OptimizationResult> {
    let spinner = progress_bar_spinner("Optimizing".to_string());
    let started = Instant::now();

    let objective = |point: &[f64]| -> Result<f64> {
        let config = space.config_from(base, point)?;
        let score = harness.predict(&config)?;

        if let Some(spinner) = &spinner {
            spinner.inc(1);
            spinner.set_message(format!("last score {:.6} at {:?}", score, point));
        }

        Ok(score)
    };

    let result = NelderMead::new(objective, |point: &mut [f64]| space.project(point), max_iterations)
        .minimize(space.start_simplex())?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    info!(
        "Optimized to {:?} (score {:.6}) in {} iterations and {} evaluations. Took {:?}",
        result.best,
        result.score,
        result.iterations,
        result.evaluations,
        started.elapsed()
    );

    Ok(result)
}
