pub mod engine;
pub mod error;
pub mod frame;
pub mod module;

pub use crate::engine::Engine;
pub use crate::error::{EngineError, EngineResult};
pub use crate::frame::Frame;
pub use crate::module::{Bus, Module, ModuleCtx, Resources};
