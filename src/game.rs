use std::{process::exit, sync::{Arc, Mutex, MutexGuard, PoisonError}, thread};

use crate::input::{command_for, Command};
use crate::render::draw_snapshot;
use crate::session::GameSession;
use crate::signal::{render_signal, RenderSignal, RenderWaiter, Repaint};
use crate::term::{self, TermManager};

use anyhow::Context;
use tracing::{error, info, warn};

pub struct Game2048 {
    term: Arc<Mutex<TermManager>>,
    session: Arc<Mutex<GameSession>>,
    signal: RenderSignal,
    waiter: RenderWaiter,
}

impl Game2048 {
    pub fn new() -> Self {
        let (signal, waiter) = render_signal();
        let session = Arc::new(Mutex::new(GameSession::new(signal.clone())));

        Game2048 { term: Arc::new(Mutex::new(TermManager::new())), session, signal, waiter }
    }

    pub fn initialize(&mut self) -> anyhow::Result<()> {
        lock(&self.term).setup()
    }

    pub fn restore(&mut self) -> anyhow::Result<()> {
        lock(&self.term).restore()
    }

    /// Starts the input thread and renders until something fails. Quitting
    /// exits the process from the input thread, so this never returns `Ok`.
    pub fn play(&mut self) -> anyhow::Result<()> {
        let session = self.session.clone();
        let signal = self.signal.clone();
        let screen = self.term.clone();

        thread::Builder::new()
            .name("input".to_string())
            .spawn(move || listen_for_input(&session, &screen, &signal))
            .context("Error spawning input thread")?;

        let mut repaint = Repaint::Full;

        loop {
            // Paint outside the session lock so a slow terminal never holds up a move
            let snapshot = lock(&self.session).snapshot();
            draw_snapshot(&mut lock(&self.term), &snapshot, repaint)?;

            repaint = self.waiter.wait()?;
        }
    }
}

///////////////////////////////////////////////////////////////////////////////

fn listen_for_input(session: &Mutex<GameSession>, screen: &Mutex<TermManager>, signal: &RenderSignal) {
    loop {
        match term::read_event() {
            Ok(event) => {
                if let Some(command) = command_for(&event) {
                    handle_command(session, screen, signal, command);
                }
            },
            Err(err) => {
                error!("{:#}", err);
                quit(screen, 1);
            },
        }
    }
}

fn handle_command(
    session: &Mutex<GameSession>,
    screen: &Mutex<TermManager>,
    signal: &RenderSignal,
    command: Command,
) {
    match command {
        Command::Move(direction) => {
            lock(session).apply(direction);
        },
        Command::Restart => restart(session, signal),
        Command::Resize => signal.request_full(),
        Command::Quit => quit(screen, 0),
    }
}

// The old session is ended and replaced under the same lock, so no move can
// land on a discarded board or see a half-built one.
fn restart(session: &Mutex<GameSession>, signal: &RenderSignal) {
    {
        let mut current = lock(session);
        info!(score = current.score(), "Restarting");

        current.end();
        *current = GameSession::new(signal.clone());
    }

    signal.request_full();
}

fn quit(screen: &Mutex<TermManager>, code: i32) -> ! {
    shut_down(screen);

    info!(code, "Exiting");
    exit(code)
}

// Waits for any frame in flight so the restore sequences don't land inside it
fn shut_down(screen: &Mutex<TermManager>) {
    if let Err(err) = lock(screen).restore() {
        warn!("{:#}", err);
    }
}

fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking holder can't leave the board half-shifted: moves build the
    // next board before assigning it
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
