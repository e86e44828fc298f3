//! Drivefolio: a terminal portfolio gallery for a public Google Drive folder.

pub mod app;
pub mod config;
pub mod drive;
pub mod export;
pub mod gallery;
pub mod html;
pub mod lightbox;
pub mod logging;
pub mod nav;
pub mod tasks;
pub mod ui;
