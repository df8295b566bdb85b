use std::{
    io::{self, Write},
    thread,
    time::Duration,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        atomic::{ AtomicBool, Ordering },
    },
};

use crossterm::{
    terminal::{ self, EnterAlternateScreen, LeaveAlternateScreen, enable_raw_mode, disable_raw_mode, SetTitle, },
    cursor::{ MoveTo, Show, Hide },
    style::Print,
    execute,
    queue,
    event::{
        self,
        Event,
        KeyEvent,
        KeyModifiers,
        KeyCode, KeyEventKind,
    },
};
use tracing::{ debug, error, info };

use crate::{
    config::{ Config, Glyphs },
    error::{ LifeError, Result },
    proc::Space,
};

/// How long the key loop waits for input before rechecking the exit flag.
const KEY_POLL: Duration = Duration::from_millis(50);

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub struct Rect{
    w: u16, // columns
    h: u16, // rows
}

/// 1-indexed position on the grid, `x` is the column.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Cursor {
    x: u16,
    y: u16,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Action {
    Move(Direction),
    Toggle,
    StartStop,
    Clear,
    Quit,
}

/// What the terminal has to do after an action was applied.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Outcome {
    Ignored,
    CursorMoved,
    Echo(bool),
    Redraw,
    Started,
    Stopped,
    Quit,
}

pub struct App {
    space: Mutex<Space>,
    running: AtomicBool,
    should_exit: AtomicBool,
    config: Config,
}

impl Rect {
    #[inline]
    pub fn new(width: u16, height: u16) -> Self {
        Rect{w: width, h: height}
    }

    pub fn term_size() -> Result<Self> {
        let (w, h) = terminal::size()?;
        if w == 0 || h == 0 {
            return Err(LifeError::TerminalTooSmall { w, h });
        }
        Ok(Rect{w, h})
    }

    #[inline]
    pub fn w(&self) -> u16 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> u16 {
        self.h
    }
}

impl Cursor {
    pub fn center(size: &Rect) -> Self {
        Cursor {
            x: (size.w() / 2).max(1),
            y: (size.h() / 2).max(1),
        }
    }

    #[inline]
    pub fn x(&self) -> u16 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> u16 {
        self.y
    }

    /// Moves one cell, never leaving `1..=w` x `1..=h`.
    pub fn step(&mut self, dir: Direction, bounds: &Rect) {
        match dir {
            Direction::Up if self.y > 1 => self.y -= 1,
            Direction::Down if self.y < bounds.h() => self.y += 1,
            Direction::Left if self.x > 1 => self.x -= 1,
            Direction::Right if self.x < bounds.w() => self.x += 1,
            _ => {},
        }
    }

    #[inline]
    fn to_move(self) -> MoveTo {
        MoveTo(self.x - 1, self.y - 1)
    }
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Action::Move(Direction::Up)),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Action::Move(Direction::Down)),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Action::Move(Direction::Left)),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Action::Move(Direction::Right)),
            KeyCode::Char(' ') => Some(Action::Toggle),
            KeyCode::Enter => Some(Action::StartStop),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Clear),
            _ => None,
        }
    }
}

impl App {

    #[inline]
    pub fn new(space: Space, config: Config) -> Self {
        App {
            space: Mutex::new(space),
            running: false.into(),
            should_exit: false.into(),
            config,
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lock_space(&self) -> Result<MutexGuard<'_, Space>> {
        self.space.lock().map_err(|_| LifeError::Poisoned)
    }

    /// Runs one action through the paused/running state machine.
    pub fn apply(&self, action: Action, cursor: &mut Cursor) -> Result<Outcome> {
        let outcome = match action {
            Action::Move(dir) => {
                let bounds = *self.lock_space()?.size();
                cursor.step(dir, &bounds);
                Outcome::CursorMoved
            },
            Action::Toggle if self.running() => Outcome::Ignored,
            Action::Toggle => {
                let mut space = self.lock_space()?;
                match space.change_state(cursor.x() as usize, cursor.y() as usize) {
                    Some(alive) => Outcome::Echo(alive),
                    None => Outcome::Ignored,
                }
            },
            Action::StartStop => {
                let was_running = self.running.fetch_xor(true, Ordering::Relaxed);
                if was_running {
                    info!("Simulation stopped");
                    Outcome::Stopped
                } else {
                    info!("Simulation started");
                    Outcome::Started
                }
            },
            Action::Clear if self.running() => Outcome::Ignored,
            Action::Clear => {
                self.lock_space()?.clear();
                debug!("Grid cleared");
                Outcome::Redraw
            },
            Action::Quit => {
                self.should_exit.store(true, Ordering::Relaxed);
                Outcome::Quit
            },
        };
        Ok(outcome)
    }
}

pub fn run(a: App) -> Result<()> {
    guarded(runup, || clear().and_then(|_| draw(a)), shutdown)
}

/// Runs `body` after `up`, and always runs `down` afterwards, even when
/// `up` failed halfway. The first error wins.
fn guarded<T, U, B, D>(up: U, body: B, down: D) -> Result<T>
where
    U: FnOnce() -> Result<()>,
    B: FnOnce() -> Result<T>,
    D: FnOnce() -> Result<()>,
{
    let r = up().and_then(|_| body());
    let d = down();
    let t = r?;
    d?;
    Ok(t)
}

fn runup() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, SetTitle("Life"))?;
    Ok(())
}

fn shutdown() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

fn clear() -> Result<()> {
    use terminal::{ Clear, ClearType };

    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

fn draw(a: App) -> Result<()> {
    let a = Arc::new(a);
    let arc_ticks = Arc::clone(&a);

    let ticker = thread::Builder::new().name("Tick machine".into()).spawn(move || {
        let r = tick_machine(&arc_ticks, &mut io::stdout());
        if let Err(e) = &r {
            error!("Tick machine failed: {}", e);
            arc_ticks.should_exit.store(true, Ordering::Relaxed);
        }
        r
    })?;

    let keys = hotkeys(&a);
    a.should_exit.store(true, Ordering::Relaxed);
    let ticks = ticker.join().map_err(|_| LifeError::TickPanicked)?;

    keys?;
    ticks?;
    Ok(())
}

fn tick_machine<W: Write>(a: &App, out: &mut W) -> Result<()> {
    let timing = &a.config().timing;
    let mut gen = 0u64;

    while !a.should_exit() {
        if !a.running() {
            thread::sleep(timing.idle());
            continue;
        }
        {
            let mut space = a.lock_space()?;
            // Enter may have stopped us while we waited for the lock
            if !a.running() {
                continue;
            }
            space.tick();
            render(&space, &a.config().glyphs, out)?;
            gen += 1;
            debug!("Generation {}, population {}", gen, space.population());
        }
        thread::sleep(timing.tick());
    }
    Ok(())
}

fn hotkeys(a: &App) -> Result<()> {
    let mut out = io::stdout();
    let mut cursor = Cursor::center(a.lock_space()?.size());
    perform(a, &mut out, Outcome::CursorMoved, cursor)?;

    while !a.should_exit() {
        if !event::poll(KEY_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(action) = Action::from_key(&key) {
            let outcome = a.apply(action, &mut cursor)?;
            debug!("{:?} -> {:?} at ({}, {})", action, outcome, cursor.x(), cursor.y());
            perform(a, &mut out, outcome, cursor)?;
        }
    }
    Ok(())
}

/// Writes the screen side of an outcome. Holds the grid lock so these
/// sequences never interleave with a frame from the tick machine.
fn perform<W: Write>(a: &App, out: &mut W, outcome: Outcome, cursor: Cursor) -> Result<()> {
    let space = a.lock_space()?;
    let glyphs = &a.config().glyphs;

    match outcome {
        Outcome::Ignored | Outcome::Quit => return Ok(()),
        Outcome::CursorMoved => queue!(out, cursor.to_move())?,
        Outcome::Echo(alive) => queue!(out, cursor.to_move(), Print(glyphs.of(alive)), cursor.to_move())?,
        Outcome::Redraw => {
            render(&space, glyphs, out)?;
            queue!(out, cursor.to_move())?;
        },
        Outcome::Started => queue!(out, Hide)?,
        Outcome::Stopped => queue!(out, cursor.to_move(), Show)?,
    }
    out.flush()?;
    Ok(())
}

/// Full redraw of every cell.
pub fn render<W: Write>(space: &Space, glyphs: &Glyphs, out: &mut W) -> Result<()> {
    let mut line = String::with_capacity(space.cols());
    for r in 0..space.rows() {
        line.clear();
        line.extend(space.row(r).iter().map(|alive| glyphs.of(*alive)));
        queue!(out, MoveTo(0, r as u16), Print(&line))?;
    }
    out.flush()?;
    Ok(())
}
