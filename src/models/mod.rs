pub mod cost;
pub mod lenient;
pub mod resource;
pub mod summary;
pub mod types;

pub use cost::*;
pub use resource::*;
pub use summary::*;
pub use types::*;
