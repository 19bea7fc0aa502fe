use crate::errors::{LiapError, LiapResult};

/// Options of a Liapunov solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LiapParams {
    /// Diagnostic verbosity, 0 to 3. Has no effect on results.
    pub trace: u8,
    /// Number of attempts: the start profile, then random restarts.
    pub n_tries: usize,
    /// Stop once this many solutions were accepted; 0 means never.
    pub stop_after: usize,
    /// Iteration cap of each line search.
    pub maxits1: usize,
    /// Tolerance of each line search.
    pub tol1: f64,
    /// Cap on Powell's outer iterations.
    pub maxits_n: usize,
    /// Fractional decrease below which Powell has converged.
    pub tol_n: f64,
    /// Seed of the restart sampler. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for LiapParams {
    fn default() -> LiapParams {
        LiapParams {
            trace: 0,
            n_tries: 10,
            stop_after: 1,
            maxits1: 100,
            tol1: 2.0e-10,
            maxits_n: 20,
            tol_n: 1.0e-10,
            seed: None,
        }
    }
}

impl LiapParams {
    pub fn validate(&self) -> LiapResult<()> {
        if self.n_tries == 0 {
            return Err(LiapError::InvalidParams(
                "at least one try is required".to_string(),
            ));
        }
        if self.maxits1 == 0 || self.maxits_n == 0 {
            return Err(LiapError::InvalidParams(
                "iteration caps must be positive".to_string(),
            ));
        }
        for (name, tol) in [("tol1", self.tol1), ("tolN", self.tol_n)].iter() {
            if !tol.is_finite() || *tol <= 0.0 {
                return Err(LiapError::InvalidParams(format!(
                    "{} must be positive and finite, got {}",
                    name, tol
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = LiapParams::default();
        assert_eq!(params.n_tries, 10);
        assert_eq!(params.stop_after, 1);
        assert_eq!(params.maxits1, 100);
        assert_eq!(params.maxits_n, 20);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = vec![
            LiapParams {
                n_tries: 0,
                ..Default::default()
            },
            LiapParams {
                maxits_n: 0,
                ..Default::default()
            },
            LiapParams {
                tol1: -1.0,
                ..Default::default()
            },
            LiapParams {
                tol_n: std::f64::NAN,
                ..Default::default()
            },
        ];
        for params in bad {
            match params.validate() {
                Err(LiapError::InvalidParams(_)) => {}
                other => panic!("Expected invalid parameters, got {:?}", other),
            }
        }
    }
}
