pub mod cart;
pub mod config;
pub mod demo;
pub mod locale;
