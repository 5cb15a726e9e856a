// HTTP routes
pub mod export;
pub mod health;
pub mod links;
pub mod webhook;
pub mod ws;

pub use export::*;
pub use health::*;
pub use links::*;
pub use webhook::*;
pub use ws::*;
