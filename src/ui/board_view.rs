//! Board rendering for the Keystone GUI

use crate::engine::CellMarks;
use crate::{Cell, Engine, Player, Pos, BOARD_SIZE};
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use super::theme::*;

/// A click on the board, translated to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardClick {
    pub pos: Pos,
    /// Right click: used to convert a stone during core resolution
    pub secondary: bool,
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 30.0,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the click, if any
    pub fn show(&mut self, ui: &mut egui::Ui, engine: &Engine) -> Option<BoardClick> {
        let available_size = ui.available_size();

        let board_size = available_size.x.min(available_size.y) - 20.0;
        self.cell_size = (board_size - 2.0 * BOARD_MARGIN) / (BOARD_SIZE as f32 - 1.0);

        let (response, painter) =
            ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());

        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_grid(&painter);
        self.draw_star_points(&painter);
        self.draw_coordinates(&painter);

        let marks = engine.cell_marks();
        self.draw_marks_under(&painter, &marks);
        self.draw_stones(&painter, engine);
        self.draw_marks_over(&painter, engine, &marks);

        if let Some(mv) = engine.last_move() {
            self.draw_last_move_marker(&painter, mv.pos);
        }
        if let Some(line) = engine.winning_line() {
            self.draw_winning_line(&painter, &line);
        }

        if engine.is_over() {
            return None;
        }

        let pointer_pos = response.hover_pos()?;
        let board_pos = self.screen_to_board(pointer_pos)?;

        let placeable = engine.legal_placements().contains(&board_pos);
        if placeable {
            self.draw_hover_preview(&painter, board_pos, engine.active_player());
        } else if engine.board().is_empty(board_pos) {
            let radius = self.cell_size * STONE_RADIUS_RATIO;
            painter.circle_filled(self.board_to_screen(board_pos), radius, hover_invalid());
        }

        if response.clicked() {
            Some(BoardClick { pos: board_pos, secondary: false })
        } else if response.secondary_clicked() {
            Some(BoardClick { pos: board_pos, secondary: true })
        } else {
            None
        }
    }

    /// Draw the 17x17 grid lines
    fn draw_grid(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);
        let span = (BOARD_SIZE as f32 - 1.0) * self.cell_size;

        for i in 0..BOARD_SIZE {
            let offset = BOARD_MARGIN + i as f32 * self.cell_size;

            let start = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN);
            let end = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN + span);
            painter.line_segment([start, end], stroke);

            let start = self.board_rect.min + Vec2::new(BOARD_MARGIN, offset);
            let end = self.board_rect.min + Vec2::new(BOARD_MARGIN + span, offset);
            painter.line_segment([start, end], stroke);
        }
    }

    fn draw_star_points(&self, painter: &Painter) {
        for (row, col) in STAR_POINTS {
            let center = self.board_to_screen(Pos::new(row, col));
            painter.circle_filled(center, STAR_POINT_RADIUS, STAR_POINT);
        }
    }

    /// Draw coordinate labels (A-Q, 17-1)
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(12.0);

        for col in 0..BOARD_SIZE {
            let letter = (b'A' + col as u8) as char;
            let x = self.board_rect.min.x + BOARD_MARGIN + col as f32 * self.cell_size;

            let pos = Pos2::new(x, self.board_rect.min.y + 12.0);
            painter.text(pos, egui::Align2::CENTER_CENTER, letter, font.clone(), GRID_LINE);
            let pos = Pos2::new(x, self.board_rect.max.y - 12.0);
            painter.text(pos, egui::Align2::CENTER_CENTER, letter, font.clone(), GRID_LINE);
        }

        for row in 0..BOARD_SIZE {
            let num = BOARD_SIZE - row;
            let y = self.board_rect.min.y + BOARD_MARGIN + row as f32 * self.cell_size;

            let pos = Pos2::new(self.board_rect.min.x + 12.0, y);
            painter.text(pos, egui::Align2::CENTER_CENTER, num.to_string(), font.clone(), GRID_LINE);
            let pos = Pos2::new(self.board_rect.max.x - 12.0, y);
            painter.text(pos, egui::Align2::CENTER_CENTER, num.to_string(), font.clone(), GRID_LINE);
        }
    }

    /// Core squares and resonance trails, drawn beneath stones
    fn draw_marks_under(&self, painter: &Painter, marks: &[[CellMarks; BOARD_SIZE]; BOARD_SIZE]) {
        let half = self.cell_size * 0.5;
        for (row, line) in marks.iter().enumerate() {
            for (col, mark) in line.iter().enumerate() {
                let center = self.board_to_screen(Pos::new(row as u8, col as u8));
                let cell = Rect::from_center_size(center, Vec2::splat(half * 2.0));
                if mark.highlighted {
                    painter.rect_filled(cell, CornerRadius::same(2), CORE_HIGHLIGHT.gamma_multiply(0.35));
                }
                if mark.resonating {
                    painter.circle_filled(center, half * 0.6, resonance_trail());
                }
            }
        }
    }

    /// Convertible rings and selected-core outline, drawn over stones
    fn draw_marks_over(
        &self,
        painter: &Painter,
        engine: &Engine,
        marks: &[[CellMarks; BOARD_SIZE]; BOARD_SIZE],
    ) {
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        for (row, line) in marks.iter().enumerate() {
            for (col, mark) in line.iter().enumerate() {
                if mark.convertible {
                    let center = self.board_to_screen(Pos::new(row as u8, col as u8));
                    painter.circle_stroke(center, radius + 2.0, Stroke::new(2.0, CONVERTIBLE_RING));
                }
            }
        }

        if let Some(core) = engine.selected_core() {
            let top_left = self.board_to_screen(core.anchor);
            let rect = Rect::from_min_size(top_left, Vec2::splat(self.cell_size))
                .expand(self.cell_size * 0.5);
            painter.rect_stroke(
                rect,
                CornerRadius::same(4),
                Stroke::new(3.0, SELECTED_CORE),
                egui::StrokeKind::Middle,
            );
        }
    }

    fn draw_stones(&self, painter: &Painter, engine: &Engine) {
        let board = engine.board();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row as u8, col as u8);
                match board.get(pos) {
                    Cell::Empty => {}
                    Cell::Conductor(player) => self.draw_stone(painter, pos, player),
                    Cell::Keystone(player) => {
                        self.draw_stone(painter, pos, player);
                        self.draw_keystone_gem(painter, pos);
                    }
                }
            }
        }
    }

    fn draw_stone(&self, painter: &Painter, pos: Pos, player: Player) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        let shadow_offset = Vec2::new(2.0, 2.0);

        match player {
            Player::Black => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 60),
                );
                painter.circle_filled(center, radius, BLACK_STONE);
                let highlight_offset = Vec2::new(-radius * 0.3, -radius * 0.3);
                painter.circle_filled(center + highlight_offset, radius * 0.2, BLACK_STONE_HIGHLIGHT);
            }
            Player::White => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 40),
                );
                painter.circle_filled(center, radius, WHITE_STONE);
                painter.circle_stroke(
                    center,
                    radius * 0.85,
                    Stroke::new(radius * 0.1, WHITE_STONE_SHADOW),
                );
            }
        }
    }

    /// Diamond marking a keystone
    fn draw_keystone_gem(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        let r = self.cell_size * STONE_RADIUS_RATIO * 0.5;
        let points = vec![
            center + Vec2::new(0.0, -r),
            center + Vec2::new(r, 0.0),
            center + Vec2::new(0.0, r),
            center + Vec2::new(-r, 0.0),
        ];
        painter.add(egui::Shape::convex_polygon(points, KEYSTONE_GEM, Stroke::NONE));
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        painter.circle_filled(center, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
    }

    fn draw_winning_line(&self, painter: &Painter, line: &[Pos; 5]) {
        let stroke = Stroke::new(4.0, WIN_HIGHLIGHT);

        for pair in line.windows(2) {
            painter.line_segment([self.board_to_screen(pair[0]), self.board_to_screen(pair[1])], stroke);
        }
        for pos in line {
            let radius = self.cell_size * STONE_RADIUS_RATIO + 3.0;
            painter.circle_stroke(self.board_to_screen(*pos), radius, stroke);
        }
    }

    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, player: Player) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        let color = match player {
            Player::Black => Color32::from_rgba_unmultiplied(20, 20, 20, 80),
            Player::White => Color32::from_rgba_unmultiplied(240, 240, 240, 80),
        };
        painter.circle_filled(center, radius, color);
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min;
        let x = (relative.x - BOARD_MARGIN + self.cell_size * 0.5) / self.cell_size;
        let y = (relative.y - BOARD_MARGIN + self.cell_size * 0.5) / self.cell_size;

        Pos::try_new(y.floor() as i32, x.floor() as i32)
    }

    /// Convert board position to screen coordinates
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        let x = self.board_rect.min.x + BOARD_MARGIN + pos.col as f32 * self.cell_size;
        let y = self.board_rect.min.y + BOARD_MARGIN + pos.row as f32 * self.cell_size;
        Pos2::new(x, y)
    }
}
