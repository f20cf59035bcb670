//! Tablero en terminal
//!
//! Redibuja las tarjetas en cada tick de refresco, sondea el servidor en
//! segundo plano y lee comandos de stdin. Un único bucle `select!` atiende
//! los tres, así cada acción termina antes de empezar la siguiente.

use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};

use dispatch_board::client::HttpFleetBackend;
use dispatch_board::config::board::BoardConfig;
use dispatch_board::models::{FleetState, UnitStatus};
use dispatch_board::services::clock::SystemClock;
use dispatch_board::services::data_transfer::EXPORT_FILE_NAME;
use dispatch_board::services::display::{BoardView, UnitView};
use dispatch_board::services::local_backup::FileBackupStore;
use dispatch_board::services::{Board, FleetEngine, Notifier, SyncController, UnitForm};

/// Notifier de terminal: guarda el último aviso para pintarlo bajo el tablero
#[derive(Default)]
struct TerminalNotifier {
    last_notice: Mutex<Option<String>>,
    loading: Mutex<Option<String>>,
}

impl TerminalNotifier {
    fn last_notice(&self) -> Option<String> {
        self.last_notice.lock().ok().and_then(|notice| notice.clone())
    }

    fn loading_message(&self) -> Option<String> {
        self.loading.lock().ok().and_then(|loading| loading.clone())
    }
}

impl Notifier for TerminalNotifier {
    fn notice(&self, message: &str) {
        log::info!("📢 {}", message);
        if let Ok(mut notice) = self.last_notice.lock() {
            *notice = Some(message.to_string());
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", format!("⚠️  {}", message).bright_red().bold());
        if let Ok(mut notice) = self.last_notice.lock() {
            *notice = Some(message.to_string());
        }
    }

    fn loading(&self, message: Option<&str>) {
        if let Ok(mut loading) = self.loading.lock() {
            *loading = message.map(str::to_string);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = BoardConfig::from_env()?;
    log::info!("🚑 Tablero conectado a {}", config.server_url);

    let notifier = Arc::new(TerminalNotifier::default());
    let backend = Arc::new(HttpFleetBackend::new(&config.server_url, config.http_timeout)?);
    let backup = Arc::new(FileBackupStore::new(&config.backup_dir));

    let engine = FleetEngine::new(FleetState::default(), Arc::new(SystemClock));
    let sync = SyncController::new(backend, backup, notifier.clone());
    let mut board = Board::new(engine, sync, notifier.clone());

    board.start().await;
    render(&board, &notifier);

    let mut refresh = interval(config.refresh_interval);
    // Tras un sondeo lento basta con un único redibujado
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut poll = interval(config.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // El primer tick de `interval` es inmediato y la carga inicial ya se hizo
    poll.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                render(&board, &notifier);
            }
            _ = poll.tick() => {
                board.poll().await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&mut board, line.trim()).await {
                    break;
                }
                render(&board, &notifier);
            }
        }
    }

    println!("{}", "👋 ¡Hasta luego!".bright_green());
    Ok(())
}

/// Ejecuta un comando. Devuelve `false` para salir; ningún fallo corta el bucle.
async fn handle_command(board: &mut Board, line: &str) -> bool {
    if board.pending_confirmation().is_some() {
        match line {
            "y" | "yes" => {
                board.resolve_confirmation(true).await;
            }
            "n" | "no" => {
                board.resolve_confirmation(false).await;
            }
            _ => eprintln!("{}", "Responde y/n".bright_yellow()),
        }
        return true;
    }

    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "quit" | "exit" => return false,
        "help" => print_help(),
        "click" => {
            board.click(rest).await;
        }
        "set" => match rest.split_once(' ') {
            Some((unit_id, status)) => {
                let _ = board.select_status(unit_id, status.trim()).await;
            }
            None => eprintln!("{}", "Uso: set <id> <estado>".bright_yellow()),
        },
        "edit" => match board.begin_edit(rest) {
            Some(form) => println!(
                "✏️  Editando {}: {} | {} | {} | {}",
                rest, form.id, form.name, form.location, form.status
            ),
            None => eprintln!("{}", format!("No existe la unidad {}", rest).bright_yellow()),
        },
        "cancel" => board.cancel_edit(),
        "submit" => match parse_form(rest) {
            Some(form) => {
                let _ = board.submit_form(&form).await;
            }
            None => eprintln!(
                "{}",
                "Uso: submit <id> | <nombre> | <base> [| <estado>]".bright_yellow()
            ),
        },
        "timers" => match rest.split_once(' ') {
            Some((at_destination, logistics)) => {
                let _ = board.save_timer_defaults(at_destination, logistics.trim()).await;
            }
            None => eprintln!("{}", "Uso: timers <atDestination> <logistics>".bright_yellow()),
        },
        "remove" => {
            if !board.request_remove(rest) {
                eprintln!("{}", format!("No existe la unidad {}", rest).bright_yellow());
            }
        }
        "sync" => board.request_sync(),
        "save" => {
            board.save_now().await;
        }
        "export" => {
            let path = if rest.is_empty() { EXPORT_FILE_NAME } else { rest };
            let _ = board.export_to_file(Path::new(path)).await;
        }
        "import" => {
            let _ = board.request_import_file(Path::new(rest)).await;
        }
        _ => eprintln!("{}", "❌ Comando inválido. Escribe 'help'.".bright_red()),
    }
    true
}

/// `id | nombre | base | estado`; el estado es opcional
fn parse_form(raw: &str) -> Option<UnitForm> {
    let fields: Vec<&str> = raw.split('|').map(str::trim).collect();
    let status = match fields.get(3) {
        Some(status) => status.parse().ok()?,
        None => UnitStatus::Available,
    };
    match fields.as_slice() {
        [id, name, location, ..] => Some(UnitForm::new(id, name, location, status)),
        _ => None,
    }
}

fn print_help() {
    println!("{}", "📋 COMANDOS".bright_green().bold());
    println!("  click <id>                      avanzar estado");
    println!("  set <id> <estado>               fijar estado");
    println!("  submit <id> | <nombre> | <base> [| <estado>]");
    println!("  edit <id> / cancel              modo edición");
    println!("  remove <id>                     retirar unidad");
    println!("  timers <destino> <logística>    duraciones en minutos");
    println!("  sync / save                     recargar / guardar");
    println!("  export [archivo] / import <archivo>");
    println!("  quit");
    let states: Vec<&str> = UnitStatus::ALL.iter().map(UnitStatus::as_str).collect();
    println!("  estados: {}", states.join(", "));
}

fn render(board: &Board, notifier: &TerminalNotifier) {
    let view = board.view();
    // Limpiar pantalla y volver al origen
    print!("\x1B[2J\x1B[H");
    print_board(&view);

    println!();
    println!("{}", board.sync().indicator().to_string().dimmed());
    if let Some(loading) = notifier.loading_message() {
        println!("{}", loading.bright_cyan());
    }
    if let Some(editing) = board.engine().editing() {
        println!("{}", format!("Editando {} (submit / cancel)", editing).bright_yellow());
    }
    if let Some(notice) = notifier.last_notice() {
        println!("{}", notice.bright_yellow());
    }
    if let Some(confirmation) = board.pending_confirmation() {
        println!("{}", format!("{} [y/n]", confirmation.message).bright_magenta().bold());
    }
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_board(view: &BoardView) {
    println!("{}", "🚑 DISPATCH BOARD".bright_blue().bold());
    println!("{}", "=================".bright_blue());
    for tile in &view.tiles {
        println!("{}", tile_line(tile));
    }
    println!();
    println!("{}", format!("Available: {}", view.available_count).bright_green().bold());
}

fn tile_line(tile: &UnitView) -> String {
    let label = format!("{:<24}", tile.status_label);
    let label = match tile.status {
        UnitStatus::Available => label.bright_green(),
        UnitStatus::Dispatched => label.bright_yellow(),
        UnitStatus::OnScene => label.bright_red(),
        UnitStatus::EnRouteToDestination => label.yellow(),
        UnitStatus::AtDestination => label.bright_magenta(),
        UnitStatus::Logistics => label.bright_cyan(),
        UnitStatus::Unavailable => label.dimmed(),
    };

    let mut line = format!("{:<8} {:<12} {:<16} {}", tile.id, tile.name, tile.location, label);
    if let Some(timer) = &tile.timer {
        let timer = format!("Time: {}", timer);
        let timer = if tile.flash_alert {
            timer.on_red().bold().to_string()
        } else {
            timer
        };
        line.push(' ');
        line.push_str(&timer);
    }
    line
}
