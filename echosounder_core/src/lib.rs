// echosounder_core/src/lib.rs

// This file defines the public modules of the library.
pub mod calibration;
pub mod error;
pub mod estimation;
pub mod footprint;
pub mod integration;
pub mod matching;
pub mod prelude;
pub mod reading;
pub mod settings;
pub mod types;
