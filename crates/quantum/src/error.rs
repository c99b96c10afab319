use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("lattice {width}x{height} has no sites")]
    EmptyLattice { width: usize, height: usize },

    #[error("coupling {name} = {value} is not finite")]
    NonFiniteCoupling { name: &'static str, value: f64 },

    #[error("model has no non-zero bonds")]
    NoBonds,

    #[error("site {site} out of range for {len} sites")]
    SiteOutOfRange { site: usize, len: usize },

    #[error("state has {len} sites, model has {expected}")]
    SizeMismatch { len: usize, expected: usize },

    #[error("state has zero norm")]
    ZeroNorm,

    #[error(transparent)]
    Tensor(#[from] tn::TnError),
}
