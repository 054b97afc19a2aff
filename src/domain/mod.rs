//! Domain layer: the revolver state machine and the ports the engine talks through.

pub mod game;
pub mod ports;
