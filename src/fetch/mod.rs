//! Data-fetch modules.

pub mod client;

pub use client::{FetchConfig, UserClient, DEFAULT_USERS_URL};
