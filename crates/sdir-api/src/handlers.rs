//! Request handlers.

pub mod analysis;
pub mod export;
pub mod health;
pub mod render;
pub mod session;
pub mod settings;

pub use analysis::*;
pub use export::*;
pub use health::*;
pub use render::*;
pub use session::*;
pub use settings::*;
