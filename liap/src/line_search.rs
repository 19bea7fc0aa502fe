//! One-dimensional minimization: bracketing by golden-section expansion with
//! parabolic extrapolation, followed by Brent's method.

use crate::errors::{LiapError, LiapResult};
use crate::objective::Objective;

const GOLD: f64 = 1.618034;
const GLIMIT: f64 = 100.0;
const TINY: f64 = 1.0e-20;
const CGOLD: f64 = 0.3819660;
const ZEPS: f64 = 1.0e-10;

/// Three abscissas with `f(b)` below both `f(a)` and `f(c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub fa: f64,
    pub fb: f64,
    pub fc: f64,
}

/// Result of a one-dimensional minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMinimum {
    pub x: f64,
    pub value: f64,
    pub converged: bool,
}

fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

/// Searches downhill from the initial points `ax` and `bx` until a minimum is bracketed.
pub fn bracket_minimum<F>(f: &mut F, ax: f64, bx: f64) -> Bracket
where
    F: FnMut(f64) -> f64,
{
    let (mut ax, mut bx) = (ax, bx);
    let mut fa = f(ax);
    let mut fb = f(bx);
    if fb > fa {
        std::mem::swap(&mut ax, &mut bx);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut cx = bx + GOLD * (bx - ax);
    let mut fc = f(cx);

    while fb > fc {
        // Parabolic extrapolation from a, b, c.
        let r = (bx - ax) * (fb - fc);
        let q = (bx - cx) * (fb - fa);
        let denom = 2.0 * sign((q - r).abs().max(TINY), q - r);
        let mut u = bx - ((bx - cx) * q - (bx - ax) * r) / denom;
        let ulim = bx + GLIMIT * (cx - bx);
        let mut fu;

        if (bx - u) * (u - cx) > 0.0 {
            // u lies between b and c.
            fu = f(u);
            if fu < fc {
                return Bracket {
                    a: bx,
                    b: u,
                    c: cx,
                    fa: fb,
                    fb: fu,
                    fc,
                };
            } else if fu > fb {
                return Bracket {
                    a: ax,
                    b: bx,
                    c: u,
                    fa,
                    fb,
                    fc: fu,
                };
            }
            u = cx + GOLD * (cx - bx);
            fu = f(u);
        } else if (cx - u) * (u - ulim) > 0.0 {
            // u lies between c and its allowed limit.
            fu = f(u);
            if fu < fc {
                bx = cx;
                cx = u;
                u = cx + GOLD * (cx - bx);
                fb = fc;
                fc = fu;
                fu = f(u);
            }
        } else if (u - ulim) * (ulim - cx) >= 0.0 {
            u = ulim;
            fu = f(u);
        } else {
            u = cx + GOLD * (cx - bx);
            fu = f(u);
        }

        ax = bx;
        bx = cx;
        cx = u;
        fa = fb;
        fb = fc;
        fc = fu;
    }

    Bracket {
        a: ax,
        b: bx,
        c: cx,
        fa,
        fb,
        fc,
    }
}

/// Brent's method on a bracketed minimum, to fractional precision `tol`.
/// Reports `converged: false` when `max_iters` iterations do not suffice; the
/// best point found so far is returned either way.
pub fn brent<F>(f: &mut F, bracket: &Bracket, tol: f64, max_iters: usize) -> LineMinimum
where
    F: FnMut(f64) -> f64,
{
    let mut a = bracket.a.min(bracket.c);
    let mut b = bracket.a.max(bracket.c);
    let (mut x, mut w, mut v) = (bracket.b, bracket.b, bracket.b);
    let (mut fx, mut fw, mut fv) = (bracket.fb, bracket.fb, bracket.fb);
    let mut d = 0f64;
    let mut e = 0f64;

    for _ in 0..max_iters {
        let xm = 0.5 * (a + b);
        let tol1 = tol * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;
        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            return LineMinimum {
                x,
                value: fx,
                converged: true,
            };
        }

        if e.abs() > tol1 {
            // Trial parabolic fit.
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let etemp = e;
            e = d;
            if p.abs() >= (0.5 * q * etemp).abs() || p <= q * (a - x) || p >= q * (b - x) {
                e = if x >= xm { a - x } else { b - x };
                d = CGOLD * e;
            } else {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = sign(tol1, xm - x);
                }
            }
        } else {
            e = if x >= xm { a - x } else { b - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + sign(tol1, d)
        };
        let fu = f(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    LineMinimum {
        x,
        value: fx,
        converged: false,
    }
}

/// Minimizes `func` along `direction` from `point`. On return `point` holds
/// the minimizer and `direction` the step actually taken.
///
/// `index` only identifies the direction in errors and traces.
pub fn line_minimize<O: Objective>(
    point: &mut [f64],
    direction: &mut [f64],
    func: &mut O,
    tol: f64,
    max_iters: usize,
    index: usize,
) -> LiapResult<LineMinimum> {
    assert_eq!(point.len(), direction.len());
    if direction.iter().all(|x| *x == 0.0) {
        return Err(LiapError::DegenerateDirection { index });
    }

    let minimum = {
        let origin: &[f64] = point;
        let dir: &[f64] = direction;
        let mut trial = vec![0f64; origin.len()];
        let mut f1dim = |t: f64| {
            for ((y, p), d) in trial.iter_mut().zip(origin.iter()).zip(dir.iter()) {
                *y = p + t * d;
            }
            func.value(&trial)
        };
        let bracket = bracket_minimum(&mut f1dim, 0.0, 1.0);
        brent(&mut f1dim, &bracket, tol, max_iters)
    };

    for (p, d) in point.iter_mut().zip(direction.iter_mut()) {
        *d *= minimum.x;
        *p += *d;
    }
    Ok(minimum)
}
