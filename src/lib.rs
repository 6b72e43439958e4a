pub mod app;
pub mod auth;
pub mod bookmarks;
pub mod client;
pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod projects;
pub mod state;
pub mod technologies;
pub mod users;
pub mod validation;

#[cfg(test)]
mod memory;
#[cfg(test)]
mod test_support;
