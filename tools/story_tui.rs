/// Story TUI — full-screen story generator with drifting particles.
///
/// Usage: story_tui [--style <name> | --style-file <path>] [--seed <n>] [--log-file <path>]
///
/// Keys: n / Enter / Space — new story, q / Esc — quit

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame, Terminal,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use story_weaver::core::view::{PlacedParticle, StoryView, ViewFrame};
use story_weaver::schema::segment::Segment;
use story_weaver::story_styles;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// Drift is authored in pixels; one terminal cell is roughly 8x16.
const PX_PER_COL: f32 = 8.0;
const PX_PER_ROW: f32 = 16.0;
/// How long the button stays lit after a press.
const PRESS_FLASH: Duration = Duration::from_millis(150);

const BACKGROUND: Color = Color::Rgb(17, 12, 34);
const PARTICLE: (u8, u8, u8) = (192, 132, 252);
const SLOT_FG: (u8, u8, u8) = (216, 180, 254);
const SLOT_BG: Color = Color::Rgb(59, 7, 100);
const LITERAL_FG: Color = Color::Rgb(235, 235, 240);

#[derive(Parser, Debug)]
#[command(name = "story_tui", about = "Animated random story generator")]
struct Cli {
    /// Built-in style to show
    #[arg(long, default_value = story_styles::DEFAULT_STYLE, conflicts_with = "style_file")]
    style: String,

    /// Load the style from a RON file instead
    #[arg(long)]
    style_file: Option<PathBuf>,

    /// Seed for reproducible stories
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the screen is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

struct App {
    view: StoryView,
    pressed_at: Option<Instant>,
    should_quit: bool,
}

impl App {
    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') | KeyCode::Enter | KeyCode::Char(' ') => {
                self.view.regenerate();
                self.pressed_at = Some(Instant::now());
            }
            _ => {}
        }
    }

    fn button_lit(&self) -> bool {
        self.pressed_at
            .is_some_and(|at| at.elapsed() < PRESS_FLASH)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.log_file {
        init_file_logging(path)?;
    }

    let mut builder = StoryView::builder();
    builder = match cli.style_file {
        Some(ref path) => builder.style_file(path),
        None => builder.builtin_style(&cli.style),
    };
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let view = builder.build().context("Failed to load story style")?;

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App {
        view,
        pressed_at: None,
        should_quit: false,
    };
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    if let Err(err) = res {
        tracing::error!("UI loop failed: {:#}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // Randomize only once the screen exists, so the first frame drawn is
    // the placeholder.
    terminal.draw(|f| draw(f, &app.view.frame(), false))?;
    app.view.initialize();

    let mut last_tick = Instant::now();
    while !app.should_quit {
        let frame = app.view.frame();
        let lit = app.button_lit();
        terminal.draw(|f| draw(f, &frame, lit))?;

        let timeout = FRAME_INTERVAL.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        let now = Instant::now();
        app.view.advance(now - last_tick);
        last_tick = now;
    }
    Ok(())
}

fn draw(f: &mut Frame, frame: &ViewFrame, button_lit: bool) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    draw_particles(f, &frame.particles, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    let button_style = if button_lit {
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(124, 58, 237))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(91, 33, 182))
            .add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(
        format!("  {}  ", frame.button_label),
        button_style,
    )))
    .alignment(Alignment::Center);
    f.render_widget(button, rows[1].inner(ratatui::layout::Margin::new(0, 1)));

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            frame.title.as_str(),
            Style::default()
                .fg(Color::Rgb(196, 181, 253))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            frame.subtitle.as_str(),
            Style::default().fg(Color::Rgb(150, 140, 170)),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, rows[2]);

    let story_area = centered_column(rows[4], 90);
    let spans: Vec<Span> = frame
        .segments
        .iter()
        .map(|s| styled_segment(&s.segment, s.reveal.opacity))
        .collect();
    let story = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    let story_height = story.line_count(story_area.width) as u16;
    let story_area = vertically_centered(story_area, story_height);
    f.render_widget(story, story_area);

    if frame.footer_visibility > 0.0 {
        let level = (70.0 + 60.0 * frame.footer_visibility) as u8;
        let footer = Paragraph::new(Line::from(Span::styled(
            format!("{}   (q to quit)", frame.footer),
            Style::default().fg(Color::Rgb(level, level, level + 10)),
        )))
        .alignment(Alignment::Center);
        f.render_widget(footer, rows[5]);
    }
}

fn styled_segment(segment: &Segment, opacity: f32) -> Span<'_> {
    match segment {
        Segment::Literal { text, .. } => {
            Span::styled(text.as_str(), Style::default().fg(LITERAL_FG))
        }
        Segment::Slot { value, .. } => {
            // Hidden slots keep their width so the layout does not jump.
            let fg = fade(SLOT_FG, opacity);
            let style = if opacity <= 0.0 {
                Style::default().fg(BACKGROUND)
            } else {
                Style::default()
                    .fg(fg)
                    .bg(SLOT_BG)
                    .add_modifier(Modifier::BOLD)
            };
            Span::styled(value.as_str(), style)
        }
    }
}

fn draw_particles(f: &mut Frame, particles: &[PlacedParticle], area: Rect) {
    let buf = f.buffer_mut();
    for p in particles {
        if p.frame.scale < 0.1 {
            continue;
        }
        let x = area.width as f32 * p.origin_x_pct / 100.0 + p.frame.dx / PX_PER_COL;
        let y = area.height as f32 * p.origin_y_pct / 100.0 + p.frame.dy / PX_PER_ROW;
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (area.x + x as u16, area.y + y as u16);
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut((x, y)) {
            let glyph = if p.frame.scale > 0.6 { "•" } else { "·" };
            cell.set_symbol(glyph)
                .set_fg(fade(PARTICLE, 0.25 + 0.35 * p.frame.scale));
        }
    }
}

/// Blend `rgb` toward the background by `opacity`.
fn fade(rgb: (u8, u8, u8), opacity: f32) -> Color {
    let (br, bg, bb) = (17.0, 12.0, 34.0);
    let o = opacity.clamp(0.0, 1.0);
    let mix = |c: u8, b: f32| (b + (c as f32 - b) * o) as u8;
    Color::Rgb(mix(rgb.0, br), mix(rgb.1, bg), mix(rgb.2, bb))
}

fn centered_column(area: Rect, percent: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn vertically_centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}
