use crate::errors::{LiapError, LiapResult};
use crate::line_search::line_minimize;
use crate::objective::Objective;
use crate::params::LiapParams;
use crate::status::CancellationToken;
use efg_lite::vector::ProfileShape;
use log::{debug, trace};

/// Added to the convergence threshold so that a zero objective converges.
const TINY: f64 = 1.0e-25;

/// Search directions of Powell's method, one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionMatrix {
    dimension: usize,
    rows: Vec<Vec<f64>>,
}

impl DirectionMatrix {
    /// Unit vectors projected onto the tangent space of the per-infoset
    /// simplices. Moving along any row keeps every infoset's sum unchanged.
    /// Rows that vanish under the projection (single-action infosets) are left out.
    pub fn tangent(shape: &ProfileShape) -> DirectionMatrix {
        let dimension = shape.dimension();
        let mut rows = Vec::with_capacity(dimension);
        for i in 0..dimension {
            let mut row = vec![0f64; dimension];
            row[i] = 1.0;
            Self::project(shape, &mut row);
            if row.iter().any(|x| *x != 0.0) {
                rows.push(row);
            }
        }
        DirectionMatrix { dimension, rows }
    }

    /// Directions supplied by the caller. Rows may be zero, in which case the
    /// line search along them fails.
    pub fn from_rows(dimension: usize, rows: Vec<Vec<f64>>) -> LiapResult<DirectionMatrix> {
        if let Some(row) = rows.iter().find(|row| row.len() != dimension) {
            return Err(LiapError::DimensionMismatch {
                expected: dimension,
                found: row.len(),
            });
        }
        Ok(DirectionMatrix { dimension, rows })
    }

    /// Removes the mean of every infoset block of `v`.
    pub fn project(shape: &ProfileShape, v: &mut [f64]) {
        assert_eq!(v.len(), shape.dimension());
        for (_, _, range) in shape.blocks() {
            let block = &mut v[range];
            let mean = block.iter().sum::<f64>() / (block.len() as f64);
            for x in block.iter_mut() {
                *x -= mean;
            }
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowellOutcome {
    pub value: f64,
    /// Outer iterations started.
    pub iterations: usize,
    pub converged: bool,
}

/// Powell's direction-set method. Minimizes `func` starting from `point`,
/// which holds the final point on return; `directions` is updated in place.
///
/// Not converging (iteration caps, a line search running out of iterations,
/// or cancellation) is reported through `converged`; only a zero search
/// direction is an error.
pub fn powell<O: Objective>(
    point: &mut [f64],
    directions: &mut DirectionMatrix,
    func: &mut O,
    params: &LiapParams,
    token: &CancellationToken,
) -> LiapResult<PowellOutcome> {
    if point.len() != directions.dimension {
        return Err(LiapError::DimensionMismatch {
            expected: directions.dimension,
            found: point.len(),
        });
    }
    let n = directions.num_rows();

    let mut fret = func.value(point);
    let mut pt = point.to_vec();
    let mut xit = vec![0f64; point.len()];
    let mut ptt = vec![0f64; point.len()];

    let outcome = |value, iterations, converged| PowellOutcome {
        value,
        iterations,
        converged,
    };

    for iter in 1..=params.maxits_n {
        if token.is_cancelled() {
            debug!("Powell cancelled before iteration {}", iter);
            return Ok(outcome(fret, iter - 1, false));
        }

        let fp = fret;
        let mut ibig = 0;
        let mut del = 0f64;

        for i in 0..n {
            xit.copy_from_slice(&directions.rows[i]);
            let fptt = fret;
            let minimum = line_minimize(point, &mut xit, func, params.tol1, params.maxits1, i)?;
            if params.trace >= 3 {
                trace!(
                    "iteration {} direction {}: step {:e}, value {:e}",
                    iter,
                    i,
                    minimum.x,
                    minimum.value
                );
            }
            if !minimum.converged {
                return Ok(outcome(minimum.value, iter, false));
            }
            fret = minimum.value;
            if fptt - fret > del {
                del = fptt - fret;
                ibig = i;
            }
        }

        if params.trace >= 2 {
            debug!("Powell iteration {}: value {:e}", iter, fret);
        }
        if 2.0 * (fp - fret).abs() <= params.tol_n * (fp.abs() + fret.abs()) + TINY {
            return Ok(outcome(fret, iter, true));
        }

        // Extrapolated point and average direction moved.
        for j in 0..point.len() {
            ptt[j] = 2.0 * point[j] - pt[j];
            xit[j] = point[j] - pt[j];
            pt[j] = point[j];
        }
        let fptt = func.value(&ptt);
        if fptt < fp {
            let t = 2.0 * (fp - 2.0 * fret + fptt) * (fp - fret - del).powi(2)
                - del * (fp - fptt).powi(2);
            if t < 0.0 && xit.iter().any(|x| *x != 0.0) {
                let minimum = line_minimize(point, &mut xit, func, params.tol1, params.maxits1, n)?;
                if !minimum.converged {
                    return Ok(outcome(minimum.value, iter, false));
                }
                fret = minimum.value;
                if xit.iter().any(|x| *x != 0.0) {
                    directions.rows.swap(ibig, n - 1);
                    directions.rows[n - 1].copy_from_slice(&xit);
                }
            }
        }
    }

    Ok(outcome(fret, params.maxits_n, false))
}
