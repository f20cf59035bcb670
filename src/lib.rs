//! Dispatch Board
//!
//! Tablero compartido de estado para una flota pequeña: el motor de estados
//! y temporizadores, el controlador de sincronización del cliente y el
//! servicio de persistencia JSON que expone `/api/trucks`.

pub mod client;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
