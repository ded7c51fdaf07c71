// Business domains
pub mod auth;
pub mod metadata;
pub mod posts;
pub mod upload;
