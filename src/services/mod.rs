//! Services module
//!
//! Este módulo contiene la lógica del tablero: el motor de estado de la
//! flota, la derivación de la vista, la sincronización con el servidor y
//! los respaldos locales.

pub mod board;
pub mod clock;
pub mod data_transfer;
pub mod display;
pub mod fleet_engine;
pub mod local_backup;
pub mod notifier;
pub mod sync_controller;

pub use board::*;
pub use clock::*;
pub use fleet_engine::*;
pub use notifier::*;
pub use sync_controller::*;
