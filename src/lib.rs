#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod calculation;
pub mod calibration;
pub mod config;
pub mod coordinates;
pub mod image_db;
pub mod image_server;
pub mod input;
pub mod journey;
pub mod journey_manager;
mod logs;
pub mod path_geometry;
pub mod renderer;
pub mod session;
pub mod session_controller;
pub mod session_db;
pub mod storage;
pub mod utils;
pub mod viewport;
