// Domain layer: report models and ports (interfaces). No I/O happens here.

pub mod model;
pub mod ports;
