//! Commute planner server.
//!
//! A web application that answers: "which train should I catch to work,
//! and which one home?" for a morning and an evening leg, optionally with
//! the evening leg mirroring the morning one.

pub mod cache;
pub mod commute;
pub mod config;
pub mod domain;
pub mod planner;
pub mod ptv;
pub mod session;
pub mod web;
