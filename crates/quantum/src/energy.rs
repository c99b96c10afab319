use crate::error::ModelError;
use crate::model::LatticeModelSpec;
use crate::observables::Correlator;
use tn::mps::MPS;

/// Expectation value ⟨ψ|H|ψ⟩ summed bond by bond.
pub fn energy(psi: &MPS, model: &LatticeModelSpec) -> Result<f64, ModelError> {
    if psi.len() != model.len() {
        return Err(ModelError::SizeMismatch {
            len: psi.len(),
            expected: model.len(),
        });
    }
    let c = Correlator::new(psi)?;
    let mut e = 0.0;
    for b in model.bonds() {
        e += b.coupling * c.spin_spin(b.i, b.j)?;
    }
    Ok(e)
}
