use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use clozer::app::{App, AppScreen};
use clozer::config::Config;
use clozer::event::{AppEvent, EventHandler};
use clozer::logging;
use clozer::quiz::question::QuestionSet;
use clozer::session::store::{Persistence, SessionStore};
use clozer::store::json_store::JsonStore;
use clozer::store::memory::MemoryStore;
use clozer::ui::components::progress_sidebar::ProgressSidebar;
use clozer::ui::components::results_panel::ResultsPanel;
use clozer::ui::components::sentence_area::SentenceArea;
use clozer::ui::components::timer_bar::TimerBar;
use clozer::ui::components::toast::ToastStack;
use clozer::ui::components::welcome::Welcome;
use clozer::ui::components::word_options::WordOptions;
use clozer::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use clozer::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "clozer",
    version,
    about = "Timed fill-in-the-blank sentence quiz for the terminal"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Question file (JSON) to use instead of the bundled set")]
    questions: Option<PathBuf>,

    #[arg(long, help = "Seconds per question")]
    timer: Option<u32>,

    #[arg(long, help = "Keep the session in memory only")]
    no_persist: bool,

    #[arg(long, help = "Discard the saved session before starting")]
    reset: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(timer) = cli.timer {
        config.timer_seconds = timer;
    }
    if let Some(path) = &cli.questions {
        config.question_file = Some(path.display().to_string());
    }
    config.validate();

    // The TUI owns the terminal, so a missing log file is not worth aborting for.
    let _ = logging::init(&config.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting clozer");

    let questions = match &config.question_file {
        Some(path) => QuestionSet::load_file(Path::new(path))?,
        None => QuestionSet::bundled()?,
    };
    tracing::info!(count = questions.len(), "question set loaded");

    let port: Box<dyn Persistence> = if cli.no_persist {
        Box::new(MemoryStore::new())
    } else {
        match JsonStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "data dir unavailable, session will not persist");
                Box::new(MemoryStore::new())
            }
        }
    };
    let mut store = SessionStore::open(port);
    if cli.reset {
        store.reset();
    }

    let theme = Theme::load(&config.theme).unwrap_or_default();
    let tick_rate = config.tick_rate();
    let mut app = App::new(config, theme, questions, store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting on error");
    }
    result.context("terminal session failed")
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Welcome => handle_welcome_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuitConfirm => handle_quit_confirm_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::EmailEntry => handle_email_key(app, key),
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent) {
    use clozer::ui::line_input::InputResult;

    match app.name_input.handle(key) {
        InputResult::Submit => {
            app.submit_name(Instant::now());
        }
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch @ '1'..='9') => {
            let number = ch as usize - '0' as usize;
            app.select_option(number);
        }
        KeyCode::Left => app.move_blank_cursor(-1),
        KeyCode::Right => app.move_blank_cursor(1),
        KeyCode::Delete => {
            app.clear_blank_at_cursor();
        }
        KeyCode::Backspace => {
            app.clear_last_blank();
        }
        KeyCode::Enter => {
            app.submit(Instant::now());
        }
        KeyCode::Esc => app.request_quit(),
        _ => {}
    }
}

fn handle_quit_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_quit(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_quit(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.restart(Instant::now()),
        KeyCode::Char('e') => app.open_email(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_review(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_review(-1),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_email_key(app: &mut App, key: KeyEvent) {
    use clozer::ui::line_input::InputResult;

    match app.email_input.handle(key) {
        InputResult::Submit => {
            app.submit_email();
        }
        InputResult::Cancel => app.cancel_email(),
        InputResult::Continue => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Welcome => render_welcome(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuitConfirm => {
            render_quiz(frame, app);
            render_quit_confirm(frame, app);
        }
        AppScreen::Results => render_results(frame, app),
        AppScreen::EmailEntry => {
            render_results(frame, app);
            render_email_entry(frame, app);
        }
    }

    if !app.toasts.is_empty() {
        frame.render_widget(ToastStack::new(app.toasts.visible(), &app.theme), area);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " clozer ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_welcome(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, "");

    let welcome = Welcome::new(
        &app.name_input,
        app.flow.questions().len(),
        app.config.timer_seconds,
        app.resuming,
        &app.theme,
    );
    let body = Rect {
        width: layout.main.width + layout.sidebar.map(|s| s.width).unwrap_or(0),
        ..layout.main
    };
    frame.render_widget(welcome, centered_rect(70, 80, body));

    render_footer(frame, app, layout.footer, &["[Enter] Start", "[Esc] Exit"]);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let flow = &app.flow;

    let Some(question) = flow.current_question() else {
        return;
    };

    let total = flow.questions().len();
    let state = flow.store().state();
    let info = if layout.tier.show_sidebar() {
        format!(" {} ", flow.store().user_name())
    } else {
        format!(
            " Q{}/{} | Coins: {} ",
            flow.current_index() + 1,
            total,
            state.total_coins()
        )
    };
    render_header(frame, app, layout.header, &info);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(layout.main);

    frame.render_widget(
        TimerBar::new(flow.remaining_secs(), flow.countdown().ratio(), &app.theme),
        main[0],
    );

    let fragments = question.fragments();
    let title = format!("Question {} of {}", flow.current_index() + 1, total);
    frame.render_widget(
        SentenceArea::new(
            &fragments,
            flow.selected(),
            Some(app.blank_cursor),
            title,
            &app.theme,
        ),
        main[1],
    );

    let options = flow.display_options();
    let used: Vec<bool> = options.iter().map(|w| flow.is_option_used(w)).collect();
    frame.render_widget(WordOptions::new(&options, &used, &app.theme), main[2]);

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(
            ProgressSidebar::new(
                flow.current_index(),
                total,
                state.answers().len(),
                state.total_coins(),
                &app.theme,
            ),
            sidebar,
        );
    }

    let submit_hint = if flow.all_filled() {
        "[Enter] Submit"
    } else {
        "[Enter] Submit (fill all blanks)"
    };
    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[1-9] Pick word",
            "[\u{2190}\u{2192}] Blank",
            "[Del] Clear blank",
            "[Bksp] Undo",
            submit_hint,
            "[Esc] Quit",
        ],
    );
}

fn render_quit_confirm(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = centered_rect(40, 20, frame.area());
    let answered = app.flow.store().state().answers().len();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Quit the quiz?",
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("The current answer is kept; {answered} already recorded."),
            Style::default().fg(colors.text_dim()),
        )),
        Line::from(Span::styled(
            "Remaining questions will not be scored.",
            Style::default().fg(colors.text_dim()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Quit   [n] Keep going",
            Style::default().fg(colors.accent()),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::bordered()
                .title(" Confirm ")
                .border_style(Style::default().fg(colors.warning()))
                .style(Style::default().bg(colors.bg())),
        ),
        area,
    );
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, " Results ");

    let body = Rect {
        width: layout.main.width + layout.sidebar.map(|s| s.width).unwrap_or(0),
        ..layout.main
    };
    if let Some(summary) = app.summary() {
        frame.render_widget(
            ResultsPanel::new(
                summary,
                app.flow.store().user_name(),
                app.review_scroll,
                &app.theme,
            ),
            body,
        );
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[r] Restart", "[e] Email results", "[j/k] Scroll", "[q] Exit"],
    );
}

fn render_email_entry(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = centered_rect(50, 20, frame.area());

    let (before, cursor_ch, after) = app.email_input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
    let mut input_spans = vec![
        Span::styled("Email: ", Style::default().fg(colors.fg())),
        Span::styled(before.to_string(), Style::default().fg(colors.accent())),
    ];
    match cursor_ch {
        Some(ch) => input_spans.push(Span::styled(ch.to_string(), cursor_style)),
        None => input_spans.push(Span::styled(" ", cursor_style)),
    }
    input_spans.push(Span::styled(after.to_string(), Style::default().fg(colors.accent())));

    let lines = vec![
        Line::from(""),
        Line::from(input_spans),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Send   [Esc] Cancel",
            Style::default().fg(colors.text_dim()),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(" Email results ")
                .border_style(Style::default().fg(colors.accent()))
                .style(Style::default().bg(colors.bg())),
        ),
        area,
    );
}
