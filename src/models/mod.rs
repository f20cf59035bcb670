//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de la flota: unidades,
//! duraciones de temporizador y los documentos de flota completa.

pub mod fleet;
pub mod timer_defaults;
pub mod unit;

pub use fleet::*;
pub use timer_defaults::*;
pub use unit::*;
