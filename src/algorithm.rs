//! The solvers of this crate are implemented against the [`IterativeAlgorithm`]
//! trait: an algorithm advances in small atomic steps and can be observed,
//! paused, or cancelled between any two of them. This is what makes the
//! replayable trace cursor possible, and it gives batch callers cooperative
//! cancellation for free.

use crate::utils::signal_handling;
use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to drive a stepwise
/// algorithm. It does not prescribe a constructor; construction should be
/// cheap and involve little computation.
///
/// Adopters have to implement [`IterativeAlgorithm::execute_step`],
/// [`IterativeAlgorithm::is_completed`] and
/// [`IterativeAlgorithm::best_known_solution`]. If the algorithm is known to
/// eventually terminate, also adopt the marker trait
/// [`TerminatingIterativeAlgorithm`] for an easy run-to-completion interface.
///
/// # Example
/// ```
/// use atsp::algorithm::IterativeAlgorithm;
/// use atsp::graph::{SquareMatrix, Tour};
///
/// struct MyAlgorithm<'a> {
///     matrix: &'a SquareMatrix,
///     solution: Option<Tour>,
/// }
///
/// impl<'a> IterativeAlgorithm<Tour> for MyAlgorithm<'a> {
///     fn execute_step(&mut self) {
///         // do some work towards a better solution
///     }
///
///     fn is_completed(&self) -> bool {
///         false
///     }
///
///     fn best_known_solution(&mut self) -> Option<Tour> {
///         self.solution.clone()
///     }
/// }
/// ```
pub trait IterativeAlgorithm<Result> {
    /// Advances the computation by one atomic step. Must not be called again
    /// once [`IterativeAlgorithm::is_completed`] returns true.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and
    /// [`IterativeAlgorithm::execute_step`] may not be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is
    /// known yet.
    fn best_known_solution(&mut self) -> Option<Result>;

    /// Keeps calling [`IterativeAlgorithm::execute_step`] until the
    /// `predicate` becomes false, a termination signal was received, or
    /// [`IterativeAlgorithm::is_completed`] becomes true. The predicate is
    /// evaluated after each iteration, i.e. a step is carried out even if the
    /// predicate always returns false.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }

    /// Keeps calling [`IterativeAlgorithm::execute_step`] until either a
    /// timeout occurred, a termination signal was received, or
    /// [`IterativeAlgorithm::is_completed`] is true. The timeout is only
    /// guaranteed in the sense that `execute_step` is not called again after
    /// the timeout.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// Marker trait for algorithms that will eventually terminate on their own;
/// adopt it with an empty `impl` block.
pub trait TerminatingIterativeAlgorithm<Result>: IterativeAlgorithm<Result> {
    /// Executes the algorithm until it completed (or the termination signal
    /// was received) and returns the best solution found.
    fn run_to_completion(&mut self) -> Option<Result> {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();
        }
        self.best_known_solution()
    }
}
