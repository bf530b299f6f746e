use serde::Serialize;

use super::{BranchAndBound, NodeId, NodeView, SolverState};
use crate::algorithm::IterativeAlgorithm;
use crate::graph::{Cost, SquareMatrix, Tour};

/// One recorded transition of the search. `nodes` is the arena length right
/// after the step; together with the append-only arena it identifies the
/// tree as it looked at that moment. The `dead` flags are captured here
/// because they are the one per-node attribute later steps mutate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceStep {
    pub state: SolverState,
    pub nodes: usize,
    pub dead: Vec<bool>,
    pub current: NodeId,
    pub candidate: Tour,
    #[serde(serialize_with = "crate::graph::serialize_cost")]
    pub best_bound: Cost,
    pub best: Option<Tour>,
}

/// What an external renderer needs to draw one moment of the search: the
/// tree up to this step plus the candidate path to highlight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub step: TraceStep,
    pub tree: Vec<NodeView>,
}

/// Replayable cursor over a search. Stepping forward either replays an
/// already recorded step in O(1) or advances the underlying solver by
/// exactly one transition and records the result; stepping backward only
/// moves within the record. Steps are atomic, so the exposed snapshots are
/// identical no matter how often the cursor moves back and forth.
pub struct TraceCursor {
    solver: BranchAndBound,
    log: Vec<TraceStep>,
    position: usize,
}

impl TraceCursor {
    pub fn new(matrix: SquareMatrix) -> Self {
        Self {
            solver: BranchAndBound::new(matrix),
            log: Vec::new(),
            position: 0,
        }
    }

    pub fn solver(&self) -> &BranchAndBound {
        &self.solver
    }

    /// Number of steps currently exposed; 0 is the state before the search
    /// started.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn recorded_steps(&self) -> &[TraceStep] {
        &self.log
    }

    /// Advances by one step, recording a new one if the cursor sits at the
    /// recording frontier. Returns false once the search is exhausted.
    pub fn step_forward(&mut self) -> bool {
        if self.position < self.log.len() {
            self.position += 1;
            return true;
        }

        if self.solver.is_completed() {
            return false;
        }

        self.solver.execute_step();
        let nodes = self.solver.tree().map_or(0, |t| t.len());
        self.log.push(TraceStep {
            state: self.solver.state(),
            nodes,
            dead: self
                .solver
                .tree()
                .map_or_else(Vec::new, |t| t.dead_flags(nodes)),
            current: self.solver.current_node(),
            candidate: self.solver.candidate_path(),
            best_bound: self.solver.best_bound(),
            best: self.solver.best_tour().cloned(),
        });
        self.position = self.log.len();
        true
    }

    /// Re-exposes the previously recorded step. Returns false at the start.
    pub fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn current_snapshot(&self) -> Snapshot {
        if self.position == 0 {
            return Snapshot {
                step: TraceStep {
                    state: SolverState::Start,
                    nodes: 0,
                    dead: Vec::new(),
                    current: 0,
                    candidate: Tour::new(),
                    best_bound: Cost::INFINITY,
                    best: None,
                },
                tree: Vec::new(),
            };
        }

        let step = self.log[self.position - 1].clone();
        let mut tree = self
            .solver
            .tree()
            .map_or_else(Vec::new, |t| t.view(step.nodes));

        // the view reads the flags from the live arena, which has moved on;
        // overlay the ones recorded with this step
        for (view, &dead) in tree.iter_mut().zip(&step.dead) {
            view.dead = dead;
        }

        Snapshot { step, tree }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exact::solve;
    use crate::testing::classic_instance;

    #[test]
    fn forward_then_backward_replays_identically() {
        let mut cursor = TraceCursor::new(classic_instance());

        let mut snapshots = vec![cursor.current_snapshot()];
        while cursor.step_forward() {
            snapshots.push(cursor.current_snapshot());
        }
        assert!(snapshots.len() > 3);

        // in particular the dead flags must match what the forward pass saw,
        // even though the search has marked more nodes dead since
        for expected in snapshots.iter().rev().skip(1) {
            assert!(cursor.step_backward());
            assert_eq!(&cursor.current_snapshot(), expected);
        }
        assert!(!cursor.step_backward());

        // and forward again, this time replaying from the record
        for expected in snapshots.iter().skip(1) {
            assert!(cursor.step_forward());
            assert_eq!(&cursor.current_snapshot(), expected);
        }
        assert!(!cursor.step_forward());
    }

    #[test]
    fn snapshots_serialize_without_nulled_bounds() {
        let cursor = TraceCursor::new(classic_instance());
        let json = serde_json::to_string(&cursor.current_snapshot()).unwrap();
        assert!(json.contains(r#""best_bound":"inf""#));

        let mut cursor = TraceCursor::new(classic_instance());
        while cursor.step_forward() {}
        let json = serde_json::to_string(&cursor.current_snapshot()).unwrap();
        assert!(json.contains(r#""best_bound":35.0"#));
        assert!(!json.contains(r#""bound":null"#));
    }

    #[test]
    fn trace_ends_in_the_batch_solution() {
        let mut cursor = TraceCursor::new(classic_instance());
        while cursor.step_forward() {}

        let expected = solve(classic_instance()).unwrap();
        let traced = cursor.solver().best_tour().unwrap();
        assert_eq!(traced.cost(), expected.cost());

        let last = cursor.recorded_steps().last().unwrap();
        assert_eq!(last.state, SolverState::Stop);
        assert_eq!(last.best_bound, 35.0);
    }

    #[test]
    fn reset_rewinds_to_the_initial_state() {
        let mut cursor = TraceCursor::new(classic_instance());
        for _ in 0..5 {
            assert!(cursor.step_forward());
        }

        cursor.reset();
        assert_eq!(cursor.position(), 0);
        let snapshot = cursor.current_snapshot();
        assert_eq!(snapshot.step.state, SolverState::Start);
        assert!(snapshot.tree.is_empty());

        // the record survives a reset
        assert_eq!(cursor.recorded_steps().len(), 5);
    }

    #[test]
    fn selected_bounds_never_decrease() {
        let mut cursor = TraceCursor::new(classic_instance());

        let mut previous = 0.0;
        while cursor.step_forward() {
            let snapshot = cursor.current_snapshot();
            if snapshot.step.state != SolverState::LeftBranching {
                continue;
            }
            let bound = snapshot.tree[snapshot.step.current].bound;
            assert!(bound >= previous);
            previous = bound;
        }
    }
}
