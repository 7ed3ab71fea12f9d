pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use dynamodb::*;
pub use error::*;
pub use memory::*;
pub use models::*;
pub use repositories::*;
