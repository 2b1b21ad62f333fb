use std::mem;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::library::{ImportOutcome, LibraryManager};
use crate::picker::FsTextReader;
use crate::store::KeyValueStore;

use super::browser::{BrowserStep, FileBrowser};
use super::forms::{ConfirmSongDelete, EditorState};
use super::helpers::{centered_rect, scroll_to_cursor, surface_error};
use super::screens::LibraryScreen;
use super::theme::Theme;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header with the title and library summary.
const HEADER_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown.
const PAGE: isize = 5;

/// Fine-grained modes layered over the library screen.
enum Mode {
    Normal,
    Searching(SearchState),
    Editing(EditorState),
    Browsing(FileBrowser),
    ConfirmDelete(ConfirmSongDelete),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the library manager and translates key
/// presses into its operations.
pub struct App<S: KeyValueStore> {
    manager: LibraryManager<S>,
    reader: FsTextReader,
    library: LibraryScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    theme: Theme,
    browse_dir: PathBuf,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(manager: LibraryManager<S>, theme: Theme, browse_dir: PathBuf) -> Self {
        let library = LibraryScreen::new(&manager);
        Self {
            manager,
            reader: FsTextReader,
            library,
            mode: Mode::Normal,
            status: None,
            theme,
            browse_dir,
        }
    }

    pub fn manager(&self) -> &LibraryManager<S> {
        &self.manager
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current footer message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Editing(editor) => self.handle_edit(code, editor),
            Mode::Browsing(browser) => self.handle_browse(code, browser),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    /// Called once per event-loop iteration so debounced edits get written.
    pub fn tick(&mut self) {
        self.manager.tick(Instant::now());
    }

    /// Write anything still pending before the process exits.
    pub fn shutdown(&mut self) {
        if self.manager.flush() {
            info!("flushed pending edit on exit");
        }
    }

    pub(crate) fn handle_ctrl_s(&mut self) {
        if self.manager.flush() {
            self.set_status("Saved.", StatusKind::Info);
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.library.filter.is_some() {
                    self.library.set_filter(None, &self.manager);
                    self.clear_status();
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.library.move_selection(-1),
            KeyCode::Down => self.library.move_selection(1),
            KeyCode::PageUp => self.library.move_selection(-PAGE),
            KeyCode::PageDown => self.library.move_selection(PAGE),
            KeyCode::Home => self.library.select_first(),
            KeyCode::End => self.library.select_last(),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('i') | KeyCode::Char('+') => {
                self.clear_status();
                let filter = self.manager.type_filter().clone();
                return Ok(Mode::Browsing(FileBrowser::open(&self.browse_dir, filter)));
            }
            KeyCode::Char('e') => {
                if let Some(editor) = self.start_editing() {
                    return Ok(Mode::Editing(editor));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                match self.library.current().and_then(|id| self.manager.get(id)) {
                    Some(song) => return Ok(Mode::ConfirmDelete(ConfirmSongDelete::from(song))),
                    None => self.set_status("No song selected to delete.", StatusKind::Error),
                }
            }
            KeyCode::Char('/') => {
                let query = self.library.filter.clone().unwrap_or_default();
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                self.set_status(
                    format!("Switched to the {} theme.", self.theme.label()),
                    StatusKind::Info,
                );
            }
            KeyCode::Char('o') => self.open_source()?,
            KeyCode::Char('j') => self.scroll_document(1),
            KeyCode::Char('k') => self.scroll_document(-1),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.library.set_filter(None, &self.manager);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                self.select_highlighted();
                return Mode::Normal;
            }
            KeyCode::Up => {
                self.library.move_selection(-1);
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                self.library.move_selection(1);
                return Mode::Searching(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Searching(state),
        }

        self.library
            .set_filter(Some(state.query.clone()), &self.manager);
        Mode::Searching(state)
    }

    fn handle_edit(&mut self, code: KeyCode, mut editor: EditorState) -> Mode {
        let changed = match code {
            KeyCode::Esc => {
                self.manager.flush();
                let name = self
                    .manager
                    .get(editor.song_id)
                    .map(|song| song.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Saved {name}."), StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                editor.insert_char(ch);
                true
            }
            KeyCode::Tab => {
                editor.insert_char('\t');
                true
            }
            KeyCode::Enter => {
                editor.newline();
                true
            }
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => {
                editor.move_left();
                false
            }
            KeyCode::Right => {
                editor.move_right();
                false
            }
            KeyCode::Up => {
                editor.move_up();
                false
            }
            KeyCode::Down => {
                editor.move_down();
                false
            }
            KeyCode::Home => {
                editor.line_start();
                false
            }
            KeyCode::End => {
                editor.line_end();
                false
            }
            _ => false,
        };

        if changed {
            self.manager.edit_content(editor.text.clone());
        }
        Mode::Editing(editor)
    }

    fn handle_browse(&mut self, code: KeyCode, mut browser: FileBrowser) -> Mode {
        match code {
            KeyCode::Esc => {
                // Routed through the library so a dismissed dialog is handled
                // the same way as any other cancelled pick.
                self.import_from(&mut browser);
                return Mode::Normal;
            }
            KeyCode::Up => browser.move_selection(-1),
            KeyCode::Down => browser.move_selection(1),
            KeyCode::PageUp => browser.move_selection(-PAGE),
            KeyCode::PageDown => browser.move_selection(PAGE),
            KeyCode::Home => browser.select_first(),
            KeyCode::End => browser.select_last(),
            KeyCode::Backspace | KeyCode::Left => browser.go_up(),
            KeyCode::Enter | KeyCode::Right => {
                if browser.activate() == BrowserStep::Picked {
                    self.browse_dir = browser.dir.clone();
                    self.import_from(&mut browser);
                    return Mode::Normal;
                }
            }
            _ => {}
        }
        Mode::Browsing(browser)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmSongDelete) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if self.manager.delete_song(confirm.id) {
                    self.library.refresh(&self.manager);
                    self.library.scroll = 0;
                    self.set_status(format!("Deleted {}.", confirm.name), StatusKind::Info);
                } else {
                    self.set_status("Song no longer exists.", StatusKind::Error);
                }
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.clear_status();
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn import_from(&mut self, browser: &mut FileBrowser) {
        match self.manager.import_file(browser, &self.reader) {
            ImportOutcome::Imported(id) => {
                self.library.refresh(&self.manager);
                self.library.focus(id);
                let name = self
                    .manager
                    .get(id)
                    .map(|song| song.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Imported {name}."), StatusKind::Info);
            }
            ImportOutcome::Cancelled => self.clear_status(),
            ImportOutcome::Failed(err) => {
                self.set_status(
                    format!("Import failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn select_highlighted(&mut self) {
        let Some(id) = self.library.current() else {
            return;
        };
        if self.manager.selected() != Some(id) {
            self.library.scroll = 0;
        }
        self.manager.select_record(id);
    }

    fn start_editing(&mut self) -> Option<EditorState> {
        let Some(id) = self.library.current() else {
            self.set_status("No song selected to edit.", StatusKind::Error);
            return None;
        };
        self.select_highlighted();
        let song = self.manager.get(id)?;
        let editor = EditorState::from_song(song);
        let message = format!("Editing {}.", song.name);
        self.set_status(message, StatusKind::Info);
        Some(editor)
    }

    fn open_source(&mut self) -> Result<()> {
        let Some(song) = self.library.current().and_then(|id| self.manager.get(id)) else {
            self.set_status("No song selected.", StatusKind::Error);
            return Ok(());
        };
        let uri = song.uri.trim().to_string();
        let name = song.name.clone();
        if uri.is_empty() {
            self.set_status("This song has no source file.", StatusKind::Error);
        } else if let Err(err) = open_link(&uri) {
            warn!(%uri, error = %err, "failed to open source file");
            self.set_status(format!("Failed to open source: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {name}."), StatusKind::Info);
        }
        Ok(())
    }

    fn scroll_document(&mut self, offset: i32) {
        let lines = self.manager.selected_content().lines().count();
        self.library.scroll_by(offset, lines);
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT.min(area.height)),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);
        self.draw_song_list(frame, body[0]);
        self.draw_document(frame, body[1]);

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Browsing(browser) => self.draw_browser(frame, area, browser),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Editing(_) | Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut summary = vec![Span::raw(format!("{} songs", self.manager.len()))];
        if let Some(filter) = &self.library.filter {
            summary.push(Span::styled(
                format!("  •  filter \"{filter}\" ({} shown)", self.library.visible.len()),
                self.theme.highlight(),
            ));
        }
        summary.push(Span::styled(
            format!("  •  {} theme", self.theme.label()),
            self.theme.muted(),
        ));

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "OnSong Library",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(summary),
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_song_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Songs");

        if self.manager.is_empty() {
            let message = Paragraph::new("No songs yet. Press 'i' to import one.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        if self.library.visible.is_empty() {
            let message = Paragraph::new("No songs match the current search.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let selected = self.manager.selected();
        let items: Vec<ListItem> = self
            .library
            .visible
            .iter()
            .filter_map(|id| self.manager.get(*id))
            .map(|song| {
                let marker = if Some(song.id) == selected { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(song.name.clone(), self.theme.song_name()),
                    Span::styled(format!("  {} lines", song.line_count()), self.theme.muted()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight())
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.library.highlighted));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_document(&self, frame: &mut Frame, area: Rect) {
        let Some(song) = self.manager.selected_record() else {
            let message = Paragraph::new("Press Enter on a song to view it.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        };

        let mut title = song.name.clone();
        if self.manager.is_dirty() {
            title.push_str(" • unsaved");
        }

        if let Mode::Editing(editor) = &self.mode {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("Editing {title}"))
                .border_style(self.theme.highlight());
            let inner = block.inner(area);
            let (line, col) = editor.cursor_position();
            let scroll = scroll_to_cursor(line, inner.height);
            let paragraph = Paragraph::new(editor.text.as_str())
                .style(self.theme.document())
                .block(block)
                .scroll((scroll, 0));
            frame.render_widget(paragraph, area);

            let cursor_x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
            let cursor_y = inner.y + (line as u16).saturating_sub(scroll);
            frame.set_cursor_position((cursor_x, cursor_y));
            return;
        }

        let paragraph = Paragraph::new(self.manager.selected_content())
            .style(self.theme.document())
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((self.library.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " View   "),
                ("[i]", " Import   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[/]", " Search   "),
                ("[o]", " Open source   "),
                ("[t]", " Theme   "),
                ("[q]", " Quit"),
            ],
            Mode::Searching(_) => &[
                ("[type]", " Filter   "),
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " View   "),
                ("[Esc]", " Clear"),
            ],
            Mode::Editing(_) => &[
                ("[arrows]", " Move   "),
                ("[Ctrl+S]", " Save now   "),
                ("[Esc]", " Done"),
            ],
            Mode::Browsing(_) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open/Import   "),
                ("[Backspace]", " Up   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
        };

        let key_style = self.theme.key();
        Line::from(
            keys.iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(key.to_string(), key_style),
                        Span::raw(label.to_string()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .style(self.theme.base());
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_browser(&self, frame: &mut Frame, area: Rect, browser: &FileBrowser) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Import • {}", browser.dir.display()))
            .borders(Borders::ALL)
            .style(self.theme.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let (error_area, list_area) = if browser.error.is_some() && inner.height > 1 {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            (Some(chunks[0]), chunks[1])
        } else {
            (None, inner)
        };

        if let (Some(error_area), Some(error)) = (error_area, &browser.error) {
            let message = Paragraph::new(error.as_str()).style(StatusKind::Error.style());
            frame.render_widget(message, error_area);
        }

        let items: Vec<ListItem> = browser
            .entries
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    ListItem::new(format!("{}/", entry.name)).style(self.theme.key())
                } else {
                    ListItem::new(entry.name.clone())
                }
            })
            .collect();

        let list = List::new(items)
            .highlight_style(self.theme.highlight())
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(Some(browser.selected));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(Span::styled(
                "Delete song?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(confirm.name.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "The original file is not touched.",
                self.theme.muted(),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm")
                    .style(self.theme.base()),
            );
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::library::SONGS_KEY;
    use crate::store::MemoryStore;

    fn app_with(blob: Option<&str>, browse_dir: PathBuf) -> App<MemoryStore> {
        let store = match blob {
            Some(blob) => MemoryStore::with_value(SONGS_KEY, blob),
            None => MemoryStore::new(),
        };
        let manager = LibraryManager::load(store).with_edit_debounce(Duration::ZERO);
        App::new(manager, Theme::Dark, browse_dir)
    }

    fn seeded() -> App<MemoryStore> {
        app_with(
            Some(
                r#"[
                {"id":1,"name":"Xray","uri":"","content":"abc"},
                {"id":2,"name":"abc","uri":"","content":"line 1\nline 2"},
                {"id":3,"name":"x-ray","uri":"","content":""}
            ]"#,
            ),
            PathBuf::from("."),
        )
    }

    fn press(app: &mut App<MemoryStore>, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn q_quits() {
        let mut app = seeded();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn enter_selects_highlighted_song() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);

        assert_eq!(app.manager().selected_content(), "line 1\nline 2");
        assert!(render(&app).contains("line 2"));
    }

    #[test]
    fn typing_in_editor_updates_and_persists() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Char('e')]);
        type_text(&mut app, "d");
        press(&mut app, &[KeyCode::Esc]);

        let stored = app.manager().store().value(SONGS_KEY).unwrap().to_string();
        assert_eq!(app.manager().songs()[0].content, "abcd");
        assert!(stored.contains("abcd"));
        assert_eq!(app.status(), Some("Saved Xray."));
    }

    #[test]
    fn search_filters_and_escape_clears() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "x");
        let screen = render(&app);
        assert!(screen.contains("x-ray"));
        assert!(!screen.contains("abc"));

        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.manager().selected().map(|id| id.0), Some(3));

        press(&mut app, &[KeyCode::Esc]);
        assert!(!render(&app).contains("shown"));
    }

    #[test]
    fn delete_asks_before_removing() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('d')]);
        assert!(render(&app).contains("Delete song?"));

        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(app.manager().len(), 3);

        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);
        assert_eq!(app.manager().len(), 2);
        assert_eq!(app.manager().selected(), None);
        assert_eq!(app.manager().selected_content(), "");
        assert_eq!(app.status(), Some("Deleted Xray."));
    }

    #[test]
    fn theme_toggle_flips_between_schemes() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.theme(), Theme::Light);
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn browser_import_adds_song() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Hallelujah.onsong"), "[C]Hallelujah").unwrap();
        let mut app = app_with(None, dir.path().to_path_buf());

        press(&mut app, &[KeyCode::Char('i'), KeyCode::End, KeyCode::Enter]);

        assert_eq!(app.manager().len(), 1);
        assert_eq!(app.manager().songs()[0].name, "Hallelujah.onsong");
        assert_eq!(app.manager().songs()[0].content, "[C]Hallelujah");
        assert_eq!(app.status(), Some("Imported Hallelujah.onsong."));
    }

    #[test]
    fn browser_escape_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("song.onsong"), "x").unwrap();
        let mut app = app_with(None, dir.path().to_path_buf());

        press(&mut app, &[KeyCode::Char('i'), KeyCode::End, KeyCode::Esc]);

        assert!(app.manager().is_empty());
        assert_eq!(app.manager().store().writes(), 0);
        assert!(render(&app).contains("No songs yet"));
    }

    #[test]
    fn opening_a_song_without_source_reports_error() {
        let mut app = seeded();
        press(&mut app, &[KeyCode::Char('o')]);
        assert_eq!(app.status(), Some("This song has no source file."));
    }
}
