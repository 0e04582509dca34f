//! Main application for the Keystone GUI
//!
//! The app only translates input into engine commands and renders engine
//! queries; no rule logic lives here.

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel, Vec2};

use crate::engine::{GameEvent, GameStatus, Phase};
use crate::{Engine, Player, Pos, RulesError};
use super::board_view::{BoardClick, BoardView};
use super::theme::*;

/// Main Keystone application
pub struct KeystoneApp {
    engine: Engine,
    board_view: BoardView,
    /// Last rejected command, shown until the next accepted one
    message: Option<String>,
}

impl Default for KeystoneApp {
    fn default() -> Self {
        Self {
            engine: Engine::new(),
            board_view: BoardView::default(),
            message: None,
        }
    }
}

impl KeystoneApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// Report the outcome of an engine command
    fn apply(&mut self, result: Result<(), RulesError>) {
        self.message = result.err().map(|err| err.to_string());
    }

    /// Map a board click onto the command the current phase expects
    fn handle_click(&mut self, click: BoardClick) {
        let BoardClick { pos, secondary } = click;
        let phase = self.engine.phase();

        if secondary || (phase == Phase::Placing && !self.engine.board().is_empty(pos)) {
            let result = match self.engine.conversion_at(pos) {
                Some((triple, index)) => self.engine.convert_bent_triple(triple, index),
                None => Err(RulesError::NotABentTriple),
            };
            self.apply(result);
            return;
        }

        let result = match phase {
            Phase::Placing => self.engine.place_stone(pos),
            Phase::Resonating => self.select_core_at(pos),
            Phase::SelectingFocus => match self.engine.selected_core() {
                Some(core) if core.contains(pos) => self.engine.select_focus(pos),
                _ => self.select_core_at(pos),
            },
        };
        self.apply(result);
    }

    fn select_core_at(&mut self, pos: Pos) -> Result<(), RulesError> {
        let core = self
            .engine
            .pending_cores()
            .iter()
            .copied()
            .find(|core| core.contains(pos))
            .ok_or(RulesError::NotAnOfferedCore)?;
        self.engine.select_core(core)
    }

    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (N)").clicked() {
                        self.engine.reset();
                        self.message = None;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo (U)").clicked() {
                        let result = self.engine.undo();
                        self.apply(result);
                        ui.close_menu();
                    }
                    if ui.button("Redo (R)").clicked() {
                        let result = self.engine.redo();
                        self.apply(result);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(300.0)
            .frame(Frame::new().fill(egui::Color32::from_rgb(25, 27, 31)))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("KEYSTONE").size(22.0).strong().color(TEXT_PRIMARY));
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);
                self.render_actions_card(ui);
                ui.add_space(10.0);
                self.render_events_card(ui);

                if let Some(msg) = &self.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(egui::Color32::from_rgb(35, 38, 43))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let player = self.engine.active_player();
            let (stone_char, accent) = match player {
                Player::Black => ("●", egui::Color32::from_rgb(70, 70, 75)),
                Player::White => ("○", egui::Color32::from_rgb(220, 220, 225)),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    stone_char,
                    egui::FontId::proportional(28.0),
                    TEXT_PRIMARY,
                );
                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(player.to_string().to_uppercase()).size(18.0).strong().color(TEXT_PRIMARY));
                    let (status, color) = match self.engine.status() {
                        GameStatus::Won(winner) => (format!("{winner} wins!"), WIN_HIGHLIGHT),
                        GameStatus::Playing => match self.engine.phase() {
                            Phase::Placing => ("Place a conductor".to_string(), STATUS_OK),
                            Phase::Resonating => ("Choose a core".to_string(), STATUS_WARNING),
                            Phase::SelectingFocus => ("Choose the focal stone".to_string(), STATUS_WARNING),
                        },
                    };
                    ui.label(RichText::new(status).size(12.0).color(color));
                });
            });
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("↩ Undo").clicked() {
                    let result = self.engine.undo();
                    self.apply(result);
                }
                if ui.button("↪ Redo").clicked() {
                    let result = self.engine.redo();
                    self.apply(result);
                }
                if self.engine.history().in_history_mode() && ui.button("✔ Confirm").clicked() {
                    let result = self.engine.confirm_undo();
                    self.apply(result);
                }
            });

            ui.add_space(8.0);
            let history = self.engine.history();
            let text = match history.cursor() {
                Some(k) => format!("Viewing move {k} of {}", history.len()),
                None => format!("Move #{}", history.len()),
            };
            ui.label(RichText::new(text).size(11.0).color(TEXT_SECONDARY));
            ui.label(
                RichText::new("Right-click a ringed stone to convert it")
                    .size(10.0)
                    .color(TEXT_MUTED),
            );
        });
    }

    fn render_events_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("EVENTS").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                let events = self.engine.events().all();
                let start = events.len().saturating_sub(EVENT_LOG_LINES);
                for event in events[start..].iter().rev() {
                    ui.label(RichText::new(describe(event)).size(11.0).color(TEXT_SECONDARY));
                }
            });
        });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = egui::Color32::from_rgb(40, 42, 46);
            if let Some(click) = self.board_view.show(ui, &self.engine) {
                self.handle_click(click);
            }
        });
    }

    fn handle_input(&mut self, ctx: &Context) {
        let (undo, redo, reset) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::U),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::N),
            )
        });
        if undo {
            let result = self.engine.undo();
            self.apply(result);
        }
        if redo {
            let result = self.engine.redo();
            self.apply(result);
        }
        if reset {
            self.engine.reset();
            self.message = None;
        }
    }
}

/// Short label for a board position, e.g. `H9`
fn coord(pos: Pos) -> String {
    format!("{}{}", (b'A' + pos.col) as char, crate::BOARD_SIZE - pos.row as usize)
}

/// One-line description of an event for the side panel
fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::TurnStarted { player, move_number } => format!("#{move_number} {player} to move"),
        GameEvent::StonePlaced { player, pos } => format!("{player} places {}", coord(*pos)),
        GameEvent::BentTripleConvertible { player, triples } => {
            format!("{player} can convert ({} triples)", triples.len())
        }
        GameEvent::CoreFormed { player, cores } => format!("{player} formed {} core(s)", cores.len()),
        GameEvent::ResonanceActivated { player, focal, .. } => {
            format!("{player} resonates from {}", coord(*focal))
        }
        GameEvent::StoneConverted { player, pos } => format!("{player} keystone at {}", coord(*pos)),
        GameEvent::GameWon { player, .. } => format!("{player} wins"),
        GameEvent::HistoryNavigated { applied } => format!("History: {applied} moves shown"),
        GameEvent::HistoryTruncated { discarded } => format!("History: {discarded} moves discarded"),
        GameEvent::GameReset => "New game".to_string(),
    }
}

impl eframe::App for KeystoneApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);
    }
}
