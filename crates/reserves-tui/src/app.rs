//! Terminal rendering of the lookup and its event loop.

use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use reserves::{
    ControllerEvent, DetailView, LOADING_TEXT, ReservesController, suggestion_labels,
};
use tokio::sync::mpsc;
use tracing::debug;

/// Terminal application state wrapping the controller.
pub(crate) struct App {
    controller: ReservesController,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    /// Highlighted suggestion row.
    highlighted: usize,
    running: bool,
}

impl App {
    pub(crate) const fn new(
        controller: ReservesController,
        events: mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> Self {
        Self {
            controller,
            events,
            highlighted: 0,
            running: true,
        }
    }

    // ── Event loop ──────────────────────────────────────────────────────

    /// Render, wait for terminal input or a finished lookup, update, repeat.
    pub(crate) async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut input = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                Some(event) = self.events.recv() => {
                    self.on_controller_event(event);
                }
                next = input.next() => match next {
                    Some(Ok(event)) => self.on_terminal_event(&event),
                    Some(Err(e)) => return Err(e),
                    None => self.running = false,
                },
            }
        }

        Ok(())
    }

    fn on_controller_event(&mut self, event: ControllerEvent) {
        if self.controller.apply(event) {
            self.clamp_highlight();
        }
    }

    fn on_terminal_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.on_key(*key);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.running = false,
                KeyCode::Char('r') => self.controller.toggle_raw_view(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char(c) => {
                let mut query = self.controller.state().query().to_string();
                query.push(c);
                self.edit_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.controller.state().query().to_string();
                if query.pop().is_some() {
                    self.edit_query(query);
                }
            }
            KeyCode::Up => self.highlighted = self.highlighted.saturating_sub(1),
            KeyCode::Down => {
                self.highlighted += 1;
                self.clamp_highlight();
            }
            KeyCode::Enter => {
                if self.controller.select_suggestion(self.highlighted) {
                    debug!(index = self.highlighted, "Suggestion selected");
                }
                self.highlighted = 0;
            }
            _ => {}
        }
    }

    fn edit_query(&mut self, query: String) {
        self.controller.set_query(query);
        self.highlighted = 0;
    }

    fn clamp_highlight(&mut self) {
        let count = self.controller.state().suggestions().len();
        self.highlighted = self.highlighted.min(count.saturating_sub(1));
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame<'_>) {
        let state = self.controller.state();
        let labels = suggestion_labels(state);
        let suggestions_height = if labels.is_empty() {
            0
        } else {
            u16::try_from(labels.len()).unwrap_or(u16::MAX).saturating_add(2)
        };
        let status_height = u16::from(state.error().is_some()) + u16::from(state.is_loading());

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(suggestions_height),
            Constraint::Length(status_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let title = Paragraph::new(Span::styled(
            " Bank Reserves ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(title, chunks[0]);

        self.render_input(frame, chunks[1]);

        if !labels.is_empty() {
            self.render_suggestions(frame, chunks[2], labels);
        }

        let mut status = Vec::new();
        if let Some(error) = state.error() {
            status.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
        }
        if state.is_loading() {
            status.push(Line::raw(LOADING_TEXT));
        }
        frame.render_widget(Paragraph::new(status), chunks[3]);

        if let Some(view) = DetailView::from_state(state) {
            render_detail(frame, chunks[4], &view);
        }

        render_footer(frame, chunks[5]);
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let query = self.controller.state().query();
        let input = if query.is_empty() {
            Paragraph::new(Span::styled(
                "Type a bank name…",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(query)
        };
        frame.render_widget(
            input.block(Block::default().title(" Search ").borders(Borders::ALL)),
            area,
        );

        let offset = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.right().saturating_sub(2);
        frame.set_cursor_position(Position::new(
            area.x.saturating_add(1).saturating_add(offset).min(max_x),
            area.y + 1,
        ));
    }

    fn render_suggestions(&self, frame: &mut Frame<'_>, area: Rect, labels: Vec<String>) {
        let items: Vec<ListItem<'_>> = labels.into_iter().map(ListItem::new).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(self.highlighted));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, view: &DetailView) {
    let label_style = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled(
            format!("As of {}", view.as_of),
            Style::default().fg(Color::Gray),
        ),
        Line::raw(""),
    ];
    for row in view.figures.iter().chain(&view.ratios) {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", row.label), label_style),
            Span::raw(row.value.clone()),
        ]));
    }
    if let Some(raw) = &view.raw_json {
        lines.push(Line::raw(""));
        lines.extend(raw.lines().map(|l| Line::raw(l.to_string())));
    }

    let toggle_hint = if view.raw_json.is_some() {
        " Ctrl-R: Hide JSON "
    } else {
        " Ctrl-R: Show JSON "
    };
    let block = Block::default()
        .title_top(Line::styled(format!(" {} ", view.title), label_style))
        .title_top(Line::raw(toggle_hint).right_aligned())
        .borders(Borders::ALL);

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_footer(frame: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" ↑↓ ", key),
        Span::raw("Choose  "),
        Span::styled(" Enter ", key),
        Span::raw("Select  "),
        Span::styled(" Ctrl-R ", key),
        Span::raw("Raw JSON  "),
        Span::styled(" Esc ", key),
        Span::raw("Quit"),
    ]));
    frame.render_widget(footer, area);
}
