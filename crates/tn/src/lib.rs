//! Matrix product states, matrix product operators and a two-site DMRG
//! ground-state search for spin-1/2 chains.

pub mod dmrg;
pub mod env;
pub mod error;
pub mod lanczos;
pub mod mpo;
pub mod mps;
pub mod truncation;

pub use error::{DmrgError, LanczosError, TnError};
