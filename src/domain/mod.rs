// Domain layer: participants, arcs and assignments plus the ports the engine talks through.

pub mod model;
pub mod ports;
