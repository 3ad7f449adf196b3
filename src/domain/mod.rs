// Domain layer: cart model and the ports the store talks through.

pub mod model;
pub mod ports;
