pub mod adapters;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod controller;
pub mod entities;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod orchestrator;
pub mod palette;
pub mod remote;
pub mod runtime;
pub mod sequence;
pub mod state;
