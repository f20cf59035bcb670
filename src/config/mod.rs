//! Configuración del proyecto
//!
//! Variables de entorno del servidor y del tablero en terminal.

pub mod board;
pub mod environment;

pub use board::*;
pub use environment::*;
