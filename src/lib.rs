pub mod auth;
pub mod client;
pub mod core;
pub mod ride;
pub mod store;
pub mod util;

pub use client::{Endpoints, Error, Session};
