// Domain layer: models, ports and pure rule-filtering logic.

pub mod model;
pub mod ports;
pub mod services;
