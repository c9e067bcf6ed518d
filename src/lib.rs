pub mod config;
pub mod features;
pub mod logger;
pub mod model;
pub mod models;
pub mod services;
pub mod session;
pub mod theme;
pub mod validation;
pub mod web;

pub use features::{align, FeatureRow, ModelSchema};
