// Adapters layer: concrete implementations for external systems (storage, compiler, releases)

pub mod compiler;
pub mod release;
pub mod storage;
