//! UI Module - GTK4 + Libadwaita Interface
//!
//! The application drives a frameless window holding the page assistant.

pub mod app;
pub mod assistant;
pub mod page;
pub mod pages;
pub mod window;
