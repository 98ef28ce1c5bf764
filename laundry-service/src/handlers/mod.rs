pub mod auth;
pub mod employee;
pub mod health;
pub mod projection;
pub mod resource;
pub mod supplier;

pub use auth::*;
pub use employee::*;
pub use health::*;
pub use projection::*;
pub use supplier::*;
