#![allow(clippy::new_without_default)]

pub mod api;
pub mod config;
pub mod downloader;
pub mod error;
pub mod layout;
pub mod model;
pub mod scope;
