//! Pipeline module - the preparation stages and their orchestration

pub mod categorical;
pub mod config;
pub mod error;
pub mod identifier;
pub mod loader;
pub mod missing;
pub mod numeric;
pub mod prep;
pub mod selection;
pub mod split;
pub mod stage;
pub mod target;
pub mod temporal;
pub mod writer;

pub use categorical::*;
pub use config::*;
pub use error::*;
pub use identifier::*;
pub use loader::*;
pub use missing::*;
pub use numeric::*;
pub use prep::*;
pub use selection::*;
pub use split::*;
pub use stage::*;
pub use target::*;
pub use temporal::*;
pub use writer::*;
