pub mod banner;
pub mod commands;
pub mod consts;
pub mod controller;
pub mod currency;
pub mod error;
pub mod events;
pub mod form;
pub mod input;
pub mod logging;
pub mod provider;
pub mod spinner;
