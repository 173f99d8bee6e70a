// =============================================================================
// Signals Module
// =============================================================================
//
// Composite buy / sell scoring: eight independent boolean votes per side,
// summed into an integer score in [0, 8].

pub mod composite_score;

pub use composite_score::{score_row, ScoreBreakdown, Vote};
