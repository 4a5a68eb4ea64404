//! Signpad App Library
//!
//! Native host for the signature pad: replays recorded pointer scripts
//! onto a raster surface and writes out the resulting artifact.

pub mod script;

pub use script::{ReplayOutcome, Script, ScriptError, ScriptResult, ScriptStep, replay};
