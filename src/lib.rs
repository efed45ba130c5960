pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod view_models;
