use proptest::prelude::*;
use quantum::observables::Correlator;
use tn::mps::MPS;

proptest! {
    #[test]
    fn product_states_have_classical_correlations(
        spins in proptest::collection::vec(0usize..2, 2..10),
    ) {
        let psi = MPS::product(&spins).unwrap();
        let c = Correlator::new(&psi).unwrap();
        for i in 0..spins.len() {
            for j in 0..spins.len() {
                let expect = if i == j {
                    0.75
                } else if spins[i] == spins[j] {
                    0.25
                } else {
                    -0.25
                };
                prop_assert!((c.spin_spin(i, j).unwrap() - expect).abs() < 1e-12);
            }
        }
    }
}
