use correlations::{solve_radial, SolverParams};
use quantum::{GroundState, GroundStateSolver, LatticeModelSpec, SolverBudget, SolverError};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records whether the busy line was already logged when `solve` ran.
struct Watching {
    log: Captured,
    busy_before_solve: AtomicBool,
}

impl GroundStateSolver for Watching {
    fn solve(
        &self,
        model: &LatticeModelSpec,
        _budget: &SolverBudget,
    ) -> Result<GroundState, SolverError> {
        self.busy_before_solve
            .store(self.log.text().contains("solving"), Ordering::SeqCst);
        Ok(GroundState {
            psi: model.neel_state()?,
            energy: 0.0,
            sweeps: Vec::new(),
            converged: true,
        })
    }
}

#[test]
fn solving_is_logged_before_the_solver_runs() {
    let log = Captured::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let solver = Watching {
        log: log.clone(),
        busy_before_solve: AtomicBool::new(false),
    };
    let report = tracing::subscriber::with_default(subscriber, || {
        solve_radial(&solver, &SolverParams::default())
    })
    .unwrap();

    assert!(solver.busy_before_solve.load(Ordering::SeqCst));
    assert_eq!(report.reference, (2, 2));
    let text = log.text();
    assert!(text.contains("j2=0.5"), "{}", text);
    assert!(text.contains("ground state ready"), "{}", text);
}
