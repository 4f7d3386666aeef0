use std::{cell::RefCell, collections::BTreeMap, io::Write, rc::Rc};

use super::{MapLayer, Popup, Sidebar, VisualHandle};
use crate::utils::location::Position;

#[derive(Debug, Default)]
struct MapState {
    next_id: u64,
    visuals: BTreeMap<u64, (Position, Popup)>,
    view: Option<(Position, u8)>,
    open_popup: Option<u64>,
}

/// Map layer for the command line. Keeps track of what a real map would show
/// and logs every change. Clones share the same state.
#[derive(Debug, Default, Clone)]
pub struct TerminalMap {
    state: Rc<RefCell<MapState>>,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_visuals(&self) -> usize {
        self.state.borrow().visuals.len()
    }

    pub fn view(&self) -> Option<(Position, u8)> {
        self.state.borrow().view
    }

    /// Popup text of the visual opened last, if it is still on the map
    pub fn open_popup_content(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .open_popup
            .and_then(|id| state.visuals.get(&id))
            .map(|(_, popup)| popup.content())
    }
}

impl MapLayer for TerminalMap {
    fn add_visual(&mut self, position: Position, glyph: &str, popup: &Popup) -> VisualHandle {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.visuals.insert(id, (position, popup.clone()));
        log::debug!("Added {glyph} `{}` at {position}", popup.title);
        VisualHandle::new(id)
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        let mut state = self.state.borrow_mut();
        if state.visuals.remove(&handle.id()).is_none() {
            log::warn!("Visual {} is not on the map", handle.id());
        }
        if state.open_popup == Some(handle.id()) {
            state.open_popup = None;
        }
    }

    fn recenter(&mut self, position: Position, zoom: u8) {
        log::debug!("Map view set to {position} at zoom {zoom}");
        self.state.borrow_mut().view = Some((position, zoom));
    }

    fn open_popup(&mut self, handle: VisualHandle) {
        self.state.borrow_mut().open_popup = Some(handle.id());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub glyph: String,
}

/// Sidebar list for the command line. Rows are printed on demand.
#[derive(Debug, Default, Clone)]
pub struct TerminalSidebar {
    rows: Rc<RefCell<Vec<Row>>>,
}

impl TerminalSidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Row> {
        self.rows.borrow().clone()
    }

    pub fn print(&self, out: &mut impl Write) -> std::io::Result<()> {
        let rows = self.rows.borrow();
        if rows.is_empty() {
            writeln!(out, "No markers")?;
        }
        for row in rows.iter() {
            if row.description.is_empty() {
                writeln!(out, "{:>3}  {} {}", row.id, row.glyph, row.title)?;
            } else {
                writeln!(
                    out,
                    "{:>3}  {} {} ({})",
                    row.id, row.glyph, row.title, row.description
                )?;
            }
        }
        Ok(())
    }
}

impl Sidebar for TerminalSidebar {
    fn render_row(&mut self, id: usize, title: &str, description: &str, glyph: &str) {
        let mut rows = self.rows.borrow_mut();
        let row = Row {
            id,
            title: title.into(),
            description: description.into(),
            glyph: glyph.into(),
        };
        match rows.iter().position(|r| r.id >= id) {
            Some(i) if rows[i].id == id => rows[i] = row,
            Some(i) => rows.insert(i, row),
            None => rows.push(row),
        }
    }

    fn remove_row(&mut self, id: usize) {
        self.rows.borrow_mut().retain(|r| r.id != id);
    }

    fn clear_all(&mut self) {
        self.rows.borrow_mut().clear();
    }
}
