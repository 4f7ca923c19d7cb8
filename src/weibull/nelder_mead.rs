//! Two-parameter Nelder-Mead simplex
//!
//! Classic reflect/expand/contract/shrink walk over the (k, lambda) plane.
//! Terminates when the vertex costs flatten out, when the best cost stalls
//! for a run of iterations, or at the iteration cap.

use std::cmp::Ordering;

use crate::error::Result;
use crate::weibull::optimizer::{FitContext, ParamsAndLoss, WeibullOptimizer};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Vertex cost standard deviation below which the simplex has converged
const FLAT_TOLERANCE: f64 = 1e-15;

/// Initial simplex edge, absolute fallback when a coordinate is zero
const EDGE: f64 = 0.05;
const EDGE_AT_ZERO: f64 = 0.00025;

type Vertex = ([f64; 2], f64);

pub struct NelderMead {
    max_iterations: u32,
    stall_iterations: u32,
}

impl NelderMead {
    pub fn new(max_iterations: u32, stall_iterations: u32) -> Self {
        Self {
            max_iterations,
            stall_iterations,
        }
    }
}

fn edge_for(coordinate: f64) -> f64 {
    if coordinate == 0.0 {
        EDGE_AT_ZERO
    } else {
        EDGE
    }
}

fn sort_by_cost(simplex: &mut [Vertex; 3]) {
    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
}

fn cost_flatness(simplex: &[Vertex; 3]) -> f64 {
    let mean = simplex.iter().map(|v| v.1).sum::<f64>() / 3.0;
    let variance = simplex.iter().map(|v| (v.1 - mean).powi(2)).sum::<f64>() / 3.0;
    variance.sqrt()
}

impl WeibullOptimizer for NelderMead {
    fn optimize(
        &self,
        loss: &dyn Fn(f64, f64) -> f64,
        start: (f64, f64),
        ctx: &mut FitContext<'_>,
    ) -> Result<ParamsAndLoss> {
        let x0 = [start.0, start.1];
        let eval = |x: [f64; 2]| loss(x[0], x[1]);

        // x0 extended along each unit vector
        let mut simplex: [Vertex; 3] = [
            (x0, eval(x0)),
            {
                let x = [x0[0] + edge_for(x0[0]), x0[1]];
                (x, eval(x))
            },
            {
                let x = [x0[0], x0[1] + edge_for(x0[1])];
                (x, eval(x))
            },
        ];

        let mut best_seen = f64::INFINITY;
        let mut stalled: u32 = 0;

        for _ in 0..self.max_iterations {
            ctx.check_cancelled()?;
            sort_by_cost(&mut simplex);

            if cost_flatness(&simplex) < FLAT_TOLERANCE {
                break;
            }
            if simplex[0].1 < best_seen {
                best_seen = simplex[0].1;
                stalled = 0;
                ctx.report(ParamsAndLoss {
                    k: simplex[0].0[0],
                    lambda: simplex[0].0[1],
                    loss: simplex[0].1,
                });
            } else {
                stalled += 1;
                if stalled >= self.stall_iterations {
                    break;
                }
            }

            let (best_cost, second_worst_cost, worst) =
                (simplex[0].1, simplex[1].1, simplex[2]);
            let centroid = [
                (simplex[0].0[0] + simplex[1].0[0]) / 2.0,
                (simplex[0].0[1] + simplex[1].0[1]) / 2.0,
            ];

            let reflected = [
                centroid[0] + REFLECT * (centroid[0] - worst.0[0]),
                centroid[1] + REFLECT * (centroid[1] - worst.0[1]),
            ];
            let reflected_cost = eval(reflected);
            if reflected_cost < second_worst_cost && reflected_cost > best_cost {
                simplex[2] = (reflected, reflected_cost);
                continue;
            }

            if reflected_cost < best_cost {
                let expanded = [
                    centroid[0] + EXPAND * (reflected[0] - centroid[0]),
                    centroid[1] + EXPAND * (reflected[1] - centroid[1]),
                ];
                let expanded_cost = eval(expanded);
                simplex[2] = if expanded_cost < reflected_cost {
                    (expanded, expanded_cost)
                } else {
                    (reflected, reflected_cost)
                };
                continue;
            }

            if reflected_cost < worst.1 {
                let contracted = [
                    centroid[0] + CONTRACT * (reflected[0] - centroid[0]),
                    centroid[1] + CONTRACT * (reflected[1] - centroid[1]),
                ];
                let contracted_cost = eval(contracted);
                if contracted_cost < reflected_cost {
                    simplex[2] = (contracted, contracted_cost);
                    continue;
                }
            } else {
                let contracted = [
                    centroid[0] + CONTRACT * (worst.0[0] - centroid[0]),
                    centroid[1] + CONTRACT * (worst.0[1] - centroid[1]),
                ];
                let contracted_cost = eval(contracted);
                if contracted_cost < worst.1 {
                    simplex[2] = (contracted, contracted_cost);
                    continue;
                }
            }

            for i in 1..3 {
                let shrunk = [
                    simplex[0].0[0] + SHRINK * (simplex[i].0[0] - simplex[0].0[0]),
                    simplex[0].0[1] + SHRINK * (simplex[i].0[1] - simplex[0].0[1]),
                ];
                simplex[i] = (shrunk, eval(shrunk));
            }
        }

        sort_by_cost(&mut simplex);
        Ok(ParamsAndLoss {
            k: simplex[0].0[0],
            lambda: simplex[0].0[1],
            loss: simplex[0].1,
        })
    }
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::NelderMead;
    use crate::weibull::optimizer::{FitContext, WeibullOptimizer};

    proptest! {
        #[test]
        fn finds_quadratic_minimum(a in 0.5f64..6.0, b in 0.5f64..15.0) {
            let loss = move |k: f64, lambda: f64| (k - a).powi(2) + (lambda - b).powi(2);
            let best = NelderMead::new(10_000, 100)
                .optimize(&loss, (3.6, 8.0), &mut FitContext::none())
                .unwrap();
            prop_assert!((best.k - a).abs() < 1e-3, "k = {}, target {}", best.k, a);
            prop_assert!((best.lambda - b).abs() < 1e-3, "lambda = {}, target {}", best.lambda, b);
        }
    }
}
