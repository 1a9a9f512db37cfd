// Application layer: pipeline implementations composed from domain ports

pub mod pipelines;
