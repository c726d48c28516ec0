#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend.
    ///
    /// Fails with [`SolverError::SolverNotAvailable`] when the backend was compiled out.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// HiGHS when available, otherwise CBC
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::highs().or_else(|_| Self::coin_cbc()).map_err(|_| {
            SolverError::SolverNotAvailable(
                "no solver backend compiled in (enable the `cbc` or `highs` feature)".to_string(),
            )
        })
    }

    /// Backends compiled into this build
    pub fn available_backends() -> Vec<SolverBackend> {
        [SolverBackend::Highs, SolverBackend::CoinCbc]
            .into_iter()
            .filter(|&b| Self::create_from_backend(b).is_ok())
            .collect()
    }

    #[cfg(feature = "cbc")]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(CoinCbcSolver::new()))
    }

    #[cfg(not(feature = "cbc"))]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "COIN-OR CBC support was not compiled in (feature `cbc`)".to_string(),
        ))
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(HighsSolver::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "HiGHS support was not compiled in (feature `highs`)".to_string(),
        ))
    }
}
