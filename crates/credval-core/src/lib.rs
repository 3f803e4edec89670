pub mod analytics;
pub mod error;
pub mod ids;
pub mod model;
pub mod query;
pub mod stats;
pub mod types;

pub use analytics::*;
pub use error::*;
pub use ids::*;
pub use model::*;
pub use types::*;
