use thiserror::Error;

/// Structural and numerical failures of tensor-network primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TnError {
    #[error("site {site} out of range for a {len}-site chain")]
    SiteOutOfRange { site: usize, len: usize },

    #[error("dimension mismatch: {0}")]
    Dimension(String),

    #[error("numerical breakdown: {0}")]
    Numerical(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LanczosError {
    #[error("start vector is empty")]
    EmptyStart,

    #[error("start vector has zero or non-finite norm")]
    DegenerateStart,

    #[error("Lanczos iteration produced a non-finite value at step {step}")]
    NotFinite { step: usize },
}

/// Failures of a DMRG run, surfaced once to the caller without retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DmrgError {
    #[error("invalid sweep schedule: {0}")]
    InvalidSchedule(String),

    #[error("MPO and MPS disagree: {0}")]
    Shape(String),

    #[error("DMRG did not converge after {sweeps} sweeps (last energy change {delta:.3e})")]
    NotConverged { sweeps: usize, delta: f64 },

    #[error("local eigensolver failed: {0}")]
    Lanczos(#[from] LanczosError),

    #[error(transparent)]
    Tn(#[from] TnError),
}
