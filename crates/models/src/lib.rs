pub mod competition;
pub mod error;
pub mod matches;

pub use competition::*;
pub use error::*;
pub use matches::*;
