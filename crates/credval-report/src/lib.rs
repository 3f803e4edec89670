pub mod sheets;
pub mod store;

pub use sheets::*;
pub use store::*;
