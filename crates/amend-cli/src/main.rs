use amend_config::Config;
use amend_engine::io::{self, StatusLog};
use amend_engine::models::{Status, TransformId, Transformation};
use amend_engine::{Session, SessionOptions};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: amend [--apply-all] [job.json]";

struct App {
    session: Session,
    job_path: PathBuf,
    skip_suggestions: bool,
    list_state: ListState,
    message: String,
}

impl App {
    fn new(session: Session, job_path: PathBuf, skip_suggestions: bool) -> Self {
        let mut list_state = ListState::default();
        // Start on the first edit that can be acted on
        let first = session
            .next_transform(false)
            .map(|id| id.0)
            .or((session.num_transforms() > 0).then_some(0));
        list_state.select(first);

        Self {
            session,
            job_path,
            skip_suggestions,
            list_state,
            message: String::new(),
        }
    }

    fn selected(&self) -> Option<TransformId> {
        self.list_state.selected().map(TransformId)
    }

    fn next(&mut self) {
        let len = self.session.num_transforms();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.session.num_transforms();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next_available(&mut self) {
        if let Some(id) = self.session.next_transform(false) {
            self.list_state.select(Some(id.0));
        }
    }

    fn accept_selected(&mut self) {
        let Some(id) = self.selected() else {
            return;
        };
        self.message = match self.session.accept_correction(id) {
            Ok(_) => format!("Accepted {id}"),
            Err(e) => e.to_string(),
        };
        self.select_next_available();
    }

    fn reject_selected(&mut self) {
        let Some(id) = self.selected() else {
            return;
        };
        self.message = match self.session.reject_correction(id) {
            Ok(_) => format!("Rejected {id}"),
            Err(e) => e.to_string(),
        };
        self.select_next_available();
    }

    fn undo_last(&mut self) {
        self.message = match self.session.undo_last() {
            Ok(patch) => {
                self.list_state.select(Some(patch.transform.0));
                format!("Undid {}", patch.transform)
            }
            Err(e) => e.to_string(),
        };
    }

    fn apply_all(&mut self) {
        let applied = self.session.apply_all(self.skip_suggestions);
        self.message = format!("Applied {applied} transformations");
    }

    fn undo_all(&mut self) {
        let undone = self.session.undo_all();
        self.message = format!("Undid {undone} transformations");
        self.select_next_available();
    }

    fn save(&mut self) {
        self.message = match io::write_job(&self.job_path, &self.session.to_job()) {
            Ok(()) => format!("Saved to {}", self.job_path.display()),
            Err(e) => format!("Save failed: {e}"),
        };
    }

    /// Current text with the selected edit's tokens highlighted
    fn text_lines(&self) -> Vec<Line<'static>> {
        let text = self.session.current_text();
        let highlight = self.selected().and_then(|id| {
            let start = self.session.transform_document_offset(id)?;
            let end = start + self.session.transform(id.0)?.affected_text().len();
            Some((
                text.get(..start)?.to_string(),
                text.get(start..end)?.to_string(),
                text.get(end..)?.to_string(),
            ))
        });

        let current = match highlight {
            Some((before, run, after)) => Line::from(vec![
                Span::raw(before),
                Span::styled(
                    run,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(after),
            ]),
            None => Line::from(text),
        };

        let mut lines = vec![
            current,
            Line::from(""),
            Line::from(Span::styled(
                format!("Original: {}", self.session.original_text()),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
        lines.extend(self.detail_lines());
        lines
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let Some(t) = self.selected().and_then(|id| self.session.transform(id.0)) else {
            return Vec::new();
        };

        let offset = match self.session.transform_offset(t.id()) {
            Some(offset) => format!("offset {offset}"),
            None => "tokens not present".to_string(),
        };
        let alternatives: Vec<String> = self
            .session
            .overlapping_transforms(t.id())
            .iter()
            .filter(|other| other.id() != t.id())
            .map(|other| other.id().to_string())
            .collect();

        let mut lines = vec![
            Line::from(format!(
                "{} in sentence {}, edit {}: {}",
                t.id(),
                t.sentence_index(),
                t.index_in_sentence(),
                describe(t)
            )),
            Line::from(format!("Status: {}, {offset}", t.status())),
        ];
        if !alternatives.is_empty() {
            lines.push(Line::from(format!(
                "Alternatives: {}",
                alternatives.join(", ")
            )));
        }
        if let Some(score) = self.session.grammar_score() {
            lines.push(Line::from(format!("Grammar score: {score}")));
        }
        lines
    }
}

fn describe(t: &Transformation) -> String {
    let affected = t.affected_text();
    if t.has_replacement() {
        format!("\"{}\" → \"{}\"", affected.trim(), t.added_text().trim())
    } else {
        format!("\"{}\" (no replacement)", affected.trim())
    }
}

fn marker(t: &Transformation) -> (&'static str, Color) {
    match t.status() {
        Status::Accepted => ("✓", Color::Green),
        Status::Rejected => ("✗", Color::Red),
        Status::Clean if t.is_available() => ("•", Color::Yellow),
        Status::Clean => ("·", Color::DarkGray),
    }
}

fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        ignore_no_replacement: config.ignore_no_replacement,
        persist: config.persist,
    }
}

/// Log to the configured file; without one logging stays off so the TUI
/// keeps the terminal
fn init_logging(config: &Config) -> Result<()> {
    let Some(log_path) = &config.log_path else {
        return Ok(());
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut apply_all = false;
    let mut job_arg = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--apply-all" => apply_all = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with('-') => {
                eprintln!("Error: Unknown option '{other}'");
                eprintln!("{USAGE}");
                process::exit(1);
            }
            path if job_arg.is_none() => job_arg = Some(PathBuf::from(path)),
            _ => {
                eprintln!("{USAGE}");
                process::exit(1);
            }
        }
    }

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    init_logging(&config)?;
    log::info!("amend starting up, config path: {}", config_path.display());

    // Job path from CLI args or config file
    let Some(job_path) = job_arg.or_else(|| config.job_path.clone()) else {
        eprintln!("Error: No job file provided and none configured");
        eprintln!("{USAGE}");
        eprintln!("Or set job_path in {}", config_path.display());
        process::exit(1);
    };

    let job = match io::read_job(&job_path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: Job file '{}' could not be read: {e}", job_path.display());
            process::exit(1);
        }
    };

    let mut session = Session::new(job).with_options(session_options(&config));
    if config.persist {
        let status_log = StatusLog::open(config.status_log_path())?;
        log::info!("recording status updates in {}", status_log.path().display());
        session = session.with_sink(status_log);
    }

    if apply_all {
        let applied = session.apply_all(config.skip_suggestions);
        log::info!("applied {applied} transformations non-interactively");
        println!("{}", session.current_text());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, job_path, config.skip_suggestions);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('a') => app.accept_selected(),
                KeyCode::Char('r') => app.reject_selected(),
                KeyCode::Char('u') => app.undo_last(),
                KeyCode::Char('A') => app.apply_all(),
                KeyCode::Char('U') => app.undo_all(),
                KeyCode::Char('s') => app.save(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(rows[0]);

    // Transformation list panel
    let items: Vec<ListItem> = app
        .session
        .document()
        .transforms()
        .iter()
        .map(|t| {
            let (symbol, color) = marker(t);
            let mut spans = vec![
                Span::styled(format!("{symbol} "), Style::default().fg(color)),
                Span::raw(format!("{} ", t.sentence_index())),
                Span::raw(describe(t)),
            ];
            if t.is_suggestion() {
                spans.push(Span::styled(
                    " (suggestion)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(vec![Line::from(spans)])
        })
        .collect();

    let counts = app.session.document().status_counts();
    let title = format!(
        "Transformations ({} open, {} accepted, {} rejected)",
        counts[0], counts[1], counts[2]
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    // Text panel
    let content = Paragraph::new(app.text_lines())
        .block(Block::default().borders(Borders::ALL).title("Text"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Instructions and last result
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("j/k: Move | "),
        Span::raw("a: Accept | r: Reject | u: Undo | "),
        Span::raw("A: Apply all | U: Undo all | s: Save"),
    ]);
    let help = Paragraph::new(vec![help_text, Line::from(app.message.clone())])
        .block(Block::default());

    f.render_widget(help, rows[1]);
}
