pub mod config;
pub mod game;
pub mod generator;
pub mod matches;
pub mod poller;
pub mod scheduler;

pub use config::*;
pub use game::*;
pub use matches::*;
pub use poller::*;
pub use scheduler::*;
