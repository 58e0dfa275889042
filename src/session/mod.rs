pub mod database;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod shell;
pub mod types;


pub use database::*;
pub use handle::*;
pub use manager::*;
pub use registry::*;
pub use shell::*;
pub use types::*;
