//! Application state for the terminal front end.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use super::input::{digit_cell, hit_cell, move_cursor};
use crate::client::GameApi;
use crate::view::{Controller, View};

/// What the event loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the UI.
    Quit,
}

/// Main application state.
pub struct App<A> {
    controller: Controller<A>,
    cursor: usize,
    cell_areas: [Rect; 9],
}

impl<A: GameApi + 'static> App<A> {
    /// Creates an application around a controller. Cursor starts centered.
    pub fn new(controller: Controller<A>) -> Self {
        Self {
            controller,
            cursor: 4,
            cell_areas: [Rect::default(); 9],
        }
    }

    /// Current view.
    pub fn view(&self) -> &View {
        self.controller.view()
    }

    /// Cursor position (0-based cell index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Remembers where the cells were last drawn.
    pub fn set_cell_areas(&mut self, cell_areas: [Rect; 9]) {
        self.cell_areas = cell_areas;
    }

    /// Loads the initial state.
    pub fn start(&self) {
        self.controller.refresh();
    }

    /// Applies updates from finished requests.
    pub fn tick(&mut self) {
        let applied = self.controller.apply_pending();
        if applied > 0 {
            debug!(applied, "Applied view updates");
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('r') => {
                self.controller.reset();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor),
            code => {
                if let Some(index) = digit_cell(code) {
                    self.cursor = index;
                    self.click(index);
                } else {
                    self.cursor = move_cursor(self.cursor, code);
                }
            }
        }
        Flow::Continue
    }

    /// Handles a mouse event; left clicks on a cell play it.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(index) = hit_cell(&self.cell_areas, event.column, event.row) {
            self.cursor = index;
            self.click(index);
        }
    }

    fn click(&self, index: usize) {
        // Inert cells yield no task; spawned ones run detached.
        let _ = self.controller.click(index);
    }
}
