pub mod api;
pub mod config;
pub mod dates;
pub mod legacy;
pub mod logging;
pub mod model;
pub mod pages;
pub mod poll;
pub mod render;
pub mod request;
pub mod select;
pub mod synthetic;
