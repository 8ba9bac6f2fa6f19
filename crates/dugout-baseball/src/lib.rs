// Batting statistics engine: derived metrics, league baselines, team
// aggregation, side-by-side comparison, and the trivia game.

pub mod compare;
pub mod source;
pub mod stats;
pub mod trivia;
