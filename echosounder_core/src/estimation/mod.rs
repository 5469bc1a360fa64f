// echosounder_core/src/estimation/mod.rs

//! Estimators that turn a range reading into corrections for the visual map.

pub mod scale;

pub use scale::{ScaleCorrection, ScaleSolver, SearchStrategy, SolverOutcome, SolverParams};
