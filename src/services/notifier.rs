//! Avisos al usuario
//!
//! El núcleo sólo habla con la capa de presentación a través de avisos
//! no bloqueantes, avisos bloqueantes y el indicador de carga. Las
//! confirmaciones se modelan en el tablero como acciones pendientes.

use std::sync::{Arc, Mutex};

pub trait Notifier: Send + Sync {
    /// Aviso no bloqueante (fuente de datos en uso, guardado sólo local...)
    fn notice(&self, message: &str);

    /// Aviso bloqueante (validación, fallo total de persistencia)
    fn alert(&self, message: &str);

    /// Muestra (`Some`) u oculta (`None`) el indicador de carga
    fn loading(&self, message: Option<&str>);
}

/// Mantiene el indicador de carga visible mientras vive; lo oculta al soltarse,
/// sea cual sea la salida.
pub struct LoadingGuard {
    notifier: Arc<dyn Notifier>,
}

impl LoadingGuard {
    pub fn show(notifier: Arc<dyn Notifier>, message: &str) -> Self {
        notifier.loading(Some(message));
        Self { notifier }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.notifier.loading(None);
    }
}

/// Evento registrado por `RecordingNotifier`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Notice(String),
    Alert(String),
    Loading(Option<String>),
}

/// Notifier que sólo acumula eventos, para tests y ejecución sin terminal
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NoticeEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<NoticeEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NoticeEvent::Notice(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NoticeEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// `true` si el último evento de carga lo ocultó (o nunca se mostró)
    pub fn loading_cleared(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|event| match event {
                NoticeEvent::Loading(message) => Some(message.is_none()),
                _ => None,
            })
            .unwrap_or(true)
    }

    fn push(&self, event: NoticeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        self.push(NoticeEvent::Notice(message.to_string()));
    }

    fn alert(&self, message: &str) {
        self.push(NoticeEvent::Alert(message.to_string()));
    }

    fn loading(&self, message: Option<&str>) {
        self.push(NoticeEvent::Loading(message.map(str::to_string)));
    }
}
