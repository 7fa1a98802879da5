//! Application module: the model driven by the runtime and drawn by `ui`.

mod model;

pub use model::*;
