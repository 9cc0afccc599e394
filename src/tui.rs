use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;

const HELP: &str = "Up/Down to move, Enter to render, q to quit";

pub struct App {
    items: Vec<String>,
    selected: Option<usize>,
    status: String,
}

impl App {
    pub fn new(items: Vec<String>) -> App {
        let selected = if items.is_empty() { None } else { Some(0) };
        App {
            items,
            selected,
            status: HELP.to_string(),
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }
}

/// Event loop. Every Enter runs `on_select` to completion; its message goes
/// to the status line and its error ends the loop.
pub fn run_app<B, F>(terminal: &mut Terminal<B>, mut app: App, mut on_select: F) -> Result<()>
where
    B: Backend,
    F: FnMut(&str) -> Result<String>,
{
    loop {
        terminal.draw(|f| draw_ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Enter => {
                    if let Some(label) = app.selected_item().map(str::to_string) {
                        app.status = format!("Rendering {}...", label);
                        terminal.draw(|f| draw_ui(f, &app))?;
                        app.status = on_select(&label)?;
                    }
                }
                _ => {}
            }
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new("YouTube Trend Tracker")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = app
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if Some(i) == app.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![Span::styled(item.as_str(), style)]))
        })
        .collect();

    let items = List::new(items)
        .block(
            Block::default()
                .title("Visualization Options")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(items, chunks[1]);

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
}

pub fn start_tui<F>(options: Vec<String>, on_select: F) -> Result<()>
where
    F: FnMut(&str) -> Result<String>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(options);
    let res = run_app(&mut terminal, app, on_select);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(vec!["One".to_string(), "Two".to_string(), "Three".to_string()])
    }

    #[test]
    fn test_first_item_selected() {
        assert_eq!(app().selected_item(), Some("One"));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous();
        assert_eq!(app.selected_item(), Some("Three"));
        app.next();
        assert_eq!(app.selected_item(), Some("One"));
        app.next();
        app.next();
        assert_eq!(app.selected_item(), Some("Three"));
    }

    #[test]
    fn test_empty_menu() {
        let mut app = App::new(Vec::new());
        app.next();
        app.previous();
        assert_eq!(app.selected_item(), None);
    }
}
