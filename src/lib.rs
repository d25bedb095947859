//! Initial Setup - First-boot setup wizard
//!
//! This library provides:
//! - Page ordering and navigation state
//! - The page apply lifecycle
//! - The page table and skip-list configuration
//! - Session detection and completion markers
//! - The hand-off to the welcome tutorial
//! - The GTK4/Libadwaita assistant and its pages

pub mod apply;
pub mod config;
pub mod navigation;
pub mod page_table;
pub mod session;
pub mod tutorial;
pub mod ui;
