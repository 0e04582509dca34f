//! Game rules for Keystone
//!
//! This module implements the rule set:
//! - Pattern detection (bent triples, 2x2 cores)
//! - Resonance propagation from a core's focal cell
//! - Win condition (exactly five keystones in a line)

pub mod pattern;
pub mod resonance;
pub mod win;

// Re-exports for convenient access
pub use pattern::{
    convertible_positions, detect_bent_triples, detect_cores, detect_cores_touching,
    is_bent_triple, BentTriple, Core,
};
pub use resonance::{activate_resonance, Direction, Resonance, ResonancePath, MAX_RESONANCE_STEPS};
pub use win::{check_win, find_winning_line, longest_run, WIN_LENGTH};
