#![allow(non_snake_case)]

pub mod calendar;
pub mod clients;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod store;
