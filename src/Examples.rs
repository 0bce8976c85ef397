//! examples of usage of RustedODE
/// symbolic solving of first order ODEs, sampling of solution curves, task documents
pub mod ode_examples;
