use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use office_escape::{
    CellKind, Direction, Game, GameConfig, Pos, PursuitState, Snapshot, TerminalState, GRID_SIZE,
};
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const NAME_MAX: usize = 16;
const MIN_W: usize = 48;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(Option<Direction>),
    Pursuer,
    Wall,
    Floor,
    Corridor,
    Goal,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

enum Screen {
    Playing,
    EnterName(String),
    Leaderboard,
}

enum Flow {
    Continue,
    Restart,
    Quit,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_panel: Vec<String>,
    last_status: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Floor,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_panel: Vec::new(),
            last_status: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let config = GameConfig::from_env();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn run(stdout: &mut Stdout, config: GameConfig) -> Result<()> {
    let mut game = Game::new(config);
    let frame_time = Duration::from_micros(1_000_000 / game.config().render_fps.max(1));
    let catch_up = game.config().catch_up_limit();
    let handle = game.start_session(None)?;
    info!(id = handle.id, seed = handle.seed, "game view opened");

    let mut renderer = Renderer::new(GRID_SIZE, GRID_SIZE);
    let mut screen = Screen::Playing;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        match handle_key(&mut game, &mut screen, key.code) {
                            Flow::Continue => {}
                            Flow::Restart => {
                                let handle = game.restart_session()?;
                                info!(id = handle.id, seed = handle.seed, "session restarted");
                                screen = Screen::Playing;
                                renderer.needs_full = true;
                            }
                            Flow::Quit => {
                                game.end_session();
                                return Ok(());
                            }
                        }
                    }
                    _ => {}
                },
                Event::Resize(_, _) => renderer.needs_full = true,
                _ => {}
            }
        }

        let elapsed = last_frame.elapsed().min(catch_up);
        last_frame = Instant::now();
        if let Some(session) = game.session_mut() {
            let was_playing = session.is_live();
            let terminal = session.advance(elapsed);
            if was_playing && terminal.is_over() {
                info!(ticks = session.ticks(), score = session.score(), ?terminal, "session ended");
                screen = Screen::EnterName(String::new());
                renderer.needs_full = true;
            }
        }

        render(stdout, &game, &screen, &mut renderer)?;

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }
}

fn handle_key(game: &mut Game, screen: &mut Screen, code: KeyCode) -> Flow {
    match screen {
        Screen::Playing => {
            let dir = match code {
                KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Direction::Up,
                KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Direction::Down,
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Direction::Left,
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Direction::Right,
                KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
                _ => return Flow::Continue,
            };
            if let Some(session) = game.session_mut() {
                session.push_input(dir);
            }
            Flow::Continue
        }
        Screen::EnterName(name) => {
            match code {
                KeyCode::Char(c) if !c.is_control() && name.chars().count() < NAME_MAX => {
                    name.push(c);
                }
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Enter => {
                    game.submit_score(name);
                    *screen = Screen::Leaderboard;
                }
                KeyCode::Esc => *screen = Screen::Leaderboard,
                _ => {}
            }
            Flow::Continue
        }
        Screen::Leaderboard => match code {
            KeyCode::Char('r') | KeyCode::Char('R') => Flow::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Flow::Quit,
            _ => Flow::Continue,
        },
    }
}

fn render(stdout: &mut Stdout, game: &Game, screen: &Screen, renderer: &mut Renderer) -> io::Result<()> {
    let Some(session) = game.session() else {
        return Ok(());
    };
    let snapshot = session.snapshot();
    let size = snapshot.grid().size();
    let (needed_w, needed_h) = required_size(size);

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let chase = match snapshot.pursuit {
        PursuitState::Idle => "quiet",
        PursuitState::Chasing => "CHASING",
    };
    let hud = format!(
        "Score: {}  Pursuer: {}  (WASD/arrows move, q quit)",
        snapshot.score, chase
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    match screen {
        Screen::Playing => {
            let player_cell = snapshot.grid().discretize(snapshot.player.x, snapshot.player.z);
            let pursuer_cell = snapshot.grid().discretize(snapshot.pursuer.x, snapshot.pursuer.z);
            for z in 0..size {
                for x in 0..size {
                    let pos = Pos::new(x, z);
                    let cell = cell_for(&snapshot, pos, player_cell, pursuer_cell);
                    let idx = z * size + x;
                    if renderer.needs_full || cell != renderer.last[idx] {
                        renderer.last[idx] = cell;
                        draw_cell(stdout, renderer, x, z, cell)?;
                    }
                }
            }
        }
        _ => {
            // End screens take over the maze area until the next restart.
            let panel = panel_lines(game, &snapshot, screen);
            if renderer.needs_full || panel != renderer.last_panel {
                for row in 0..size {
                    stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + row as u16))?;
                    stdout.queue(Clear(ClearType::UntilNewLine))?;
                    if let Some(line) = panel.get(row) {
                        stdout.queue(Print(line))?;
                    }
                }
                renderer.last_panel = panel;
            }
        }
    }

    let status = status_line(screen);
    if renderer.needs_full || status != renderer.last_status {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + size as u16))?;
        stdout.queue(Clear(ClearType::UntilNewLine))?;
        stdout.queue(Print(status))?;
        renderer.last_status = status.to_string();
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

/// Columns and rows for the HUD, the maze and one status line.
fn required_size(grid_size: usize) -> (u16, u16) {
    let w = (grid_size * CELL_W).max(MIN_W);
    (w as u16, (grid_size + 2) as u16)
}

fn cell_for(snapshot: &Snapshot<'_>, pos: Pos, player: Option<Pos>, pursuer: Option<Pos>) -> Cell {
    if player == Some(pos) {
        let color = match snapshot.terminal {
            TerminalState::Lost => Color::DarkRed,
            _ => Color::Yellow,
        };
        return Cell {
            glyph: Glyph::Player(snapshot.facing),
            color,
        };
    }
    if pursuer == Some(pos) {
        let color = match snapshot.pursuit {
            PursuitState::Idle => Color::DarkGrey,
            PursuitState::Chasing => Color::Red,
        };
        return Cell {
            glyph: Glyph::Pursuer,
            color,
        };
    }
    let (x, z) = pos.center();
    match snapshot.classify(x, z) {
        CellKind::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Grey,
        },
        CellKind::Open => Cell {
            glyph: Glyph::Floor,
            color: Color::Reset,
        },
        CellKind::Corridor => Cell {
            glyph: Glyph::Corridor,
            color: Color::DarkGrey,
        },
        CellKind::Goal => Cell {
            glyph: Glyph::Goal,
            color: Color::Green,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, z: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player(Some(Direction::Up)) => "▲",
        Glyph::Player(Some(Direction::Down)) => "▼",
        Glyph::Player(Some(Direction::Left)) => "◀",
        Glyph::Player(Some(Direction::Right)) => "▶",
        Glyph::Player(None) => "@",
        Glyph::Pursuer => "🕴",
        Glyph::Wall => "██",
        Glyph::Floor => "  ",
        Glyph::Corridor => "░░",
        Glyph::Goal => "▣",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + z as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn panel_lines(game: &Game, snapshot: &Snapshot<'_>, screen: &Screen) -> Vec<String> {
    match screen {
        Screen::Playing => Vec::new(),
        Screen::EnterName(name) => {
            let banner = match snapshot.terminal {
                TerminalState::Won => "YOU ESCAPED!",
                _ => "CAUGHT BY THE PURSUER",
            };
            vec![
                banner.to_string(),
                String::new(),
                format!("Your score: {}", snapshot.score),
                format!("Name: {}_", name),
            ]
        }
        Screen::Leaderboard => {
            let mut lines = vec!["Leaderboard".to_string(), String::new()];
            for (idx, entry) in game.leaderboard().entries().iter().enumerate() {
                lines.push(format!("{:>2}. {:<18}{:>6}", idx + 1, entry.name, entry.score));
            }
            lines
        }
    }
}

fn status_line(screen: &Screen) -> &'static str {
    match screen {
        Screen::Playing => "Find the elevator past the dark hallway.",
        Screen::EnterName(_) => "Enter to submit, Esc to skip",
        Screen::Leaderboard => "r to restart, q to quit",
    }
}
