//! Named, observable execution of repair operations.

use rtd_model::Grid;
use tracing::trace;

/// One repair operation with a stable name for logs and tests.
///
/// The function contract is shared by the whole catalogue: return
/// `Some(modified)` when the precondition matched and the grid changed,
/// `None` for a no-op. Operations never fail; a grid an operation cannot
/// handle simply passes through.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub run: fn(&Grid) -> Option<Grid>,
}

impl Step {
    pub const fn new(name: &'static str, run: fn(&Grid) -> Option<Grid>) -> Self {
        Self { name, run }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Run an ordered sequence of steps, returning the final grid and the names
/// of the steps that actually applied.
pub fn run_steps(grid: &Grid, steps: &[Step]) -> (Grid, Vec<&'static str>) {
    let mut current = grid.clone();
    let mut applied = Vec::new();
    for step in steps {
        if let Some(next) = (step.run)(&current) {
            trace!(op = step.name, "layout repair applied");
            current = next;
            applied.push(step.name);
        }
    }
    (current, applied)
}
