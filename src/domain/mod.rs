// Domain layer: wire models, entities and ports. No HTTP here.

pub mod entities;
pub mod model;
pub mod ports;
