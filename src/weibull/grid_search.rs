//! Expanding-diamond coordinate hill-climb
//!
//! Scans rings of (k, lambda) offsets around the current best point. Any
//! strictly improving candidate becomes the new center and the ring radius
//! resets, so the search keeps walking while the surface keeps falling.
//! Without improvement the diamond expands until the radius cap.

use crate::error::Result;
use crate::weibull::optimizer::{FitContext, ParamsAndLoss, WeibullOptimizer};

/// Ring step as a fraction of the precision factor
const STEP_SCALE: f64 = 0.05;

/// Radius cap in rings per precision unit
const RADIUS_SCALE: u32 = 8;

pub struct GridSearch {
    precision: u32,
}

impl GridSearch {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    fn step(&self) -> f64 {
        STEP_SCALE / self.precision as f64
    }

    fn max_radius(&self) -> u32 {
        RADIUS_SCALE * self.precision
    }
}

impl WeibullOptimizer for GridSearch {
    fn optimize(
        &self,
        loss: &dyn Fn(f64, f64) -> f64,
        start: (f64, f64),
        ctx: &mut FitContext<'_>,
    ) -> Result<ParamsAndLoss> {
        let step = self.step();
        let max_radius = self.max_radius();

        let mut best = ParamsAndLoss {
            k: start.0,
            lambda: start.1,
            loss: loss(start.0, start.1),
        };

        let mut radius: u32 = 1;
        while radius <= max_radius {
            ctx.check_cancelled()?;

            let mut improved = false;
            // the ring |i| + |j| == radius around the current best
            'ring: for i in -(radius as i32)..=(radius as i32) {
                let rem = radius as i32 - i.abs();
                let offsets = [rem, -rem];
                let offsets = if rem == 0 { &offsets[..1] } else { &offsets[..] };
                for &j in offsets {
                    let k = best.k + i as f64 * step;
                    let lambda = best.lambda + j as f64 * step;
                    let candidate = loss(k, lambda);
                    if candidate < best.loss {
                        best = ParamsAndLoss {
                            k,
                            lambda,
                            loss: candidate,
                        };
                        improved = true;
                        break 'ring;
                    }
                }
            }

            if improved {
                // rescan tight rings around the new center
                ctx.report(best);
                radius = 1;
            } else {
                radius += 1;
            }
        }

        Ok(best)
    }
}
