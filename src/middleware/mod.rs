//! Middleware del sistema
//!
//! Este módulo contiene el middleware HTTP compartido.

pub mod cors;

pub use cors::*;
