//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`], plus the cooperative-cancellation [`Context`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use crate::messages::Msg;
use crate::screen::{Frame, Screen, compute_frame};

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug)]
pub enum Effect {
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);
}

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    ///
    /// Implementations should wait at most one frame interval and return
    /// early once `ctx.is_done()`.
    fn poll_msgs(&mut self, ctx: &Context, tx: Sender<Msg>)
    -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Initial screen width, until the driver reports a real size.
    pub width: i32,
    /// Initial screen height.
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Run the Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → tick → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End` or sends `Msg::Quit`.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let ctx = Context::new();
        let result = self.event_loop(&ctx);
        if let Err(e) = &result {
            log::error!("event loop stopped: {e}");
        }
        self.driver.close();
        result
    }

    fn event_loop(&mut self, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);

        self.process_pending(&rx, ctx, &mut prev, &mut curr)?;

        while !ctx.is_done() {
            self.driver.poll_msgs(ctx, tx.clone())?;
            if ctx.is_done() {
                break;
            }
            tx.send(Msg::Tick(Instant::now())).ok();
            self.process_pending(&rx, ctx, &mut prev, &mut curr)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut queue: VecDeque<Msg> = rx.try_iter().collect();
        let mut needs_draw = false;

        while let Some(msg) = queue.pop_front() {
            match &msg {
                Msg::Quit => {
                    ctx.cancel();
                    return Ok(());
                }
                Msg::Screen { width, height, .. } => {
                    log::debug!("screen resized to {width}x{height}");
                    *curr = Screen::new(*width, *height);
                }
                _ => {}
            }
            match self.model.update(msg) {
                Some(Effect::End) => {
                    ctx.cancel();
                    return Ok(());
                }
                None => {}
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.copy_from(curr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::glyph::Glyph;
    use crate::messages::Key;

    /// Counts ticks and records keys; quits on `q`.
    #[derive(Default)]
    struct Counter {
        ticks: usize,
        keys: Vec<char>,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Tick(_) => self.ticks += 1,
                Msg::KeyDown {
                    key: Key::Char(c), ..
                } => {
                    self.keys.push(c);
                    if c == 'q' {
                        return Some(Effect::End);
                    }
                }
                _ => {}
            }
            None
        }

        fn draw(&self, screen: &mut Screen) {
            screen.set(
                Point::new(0, 0),
                Glyph::default().with_char(char::from(b'0' + (self.ticks % 10) as u8)),
            );
        }
    }

    /// Replays one batch of scripted messages per poll.
    struct Scripted {
        batches: VecDeque<Vec<Msg>>,
        flushed: usize,
        closed: bool,
    }

    impl Scripted {
        fn new(batches: Vec<Vec<Msg>>) -> Self {
            Self {
                batches: batches.into(),
                flushed: 0,
                closed: false,
            }
        }
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            let batch = self.batches.pop_front().unwrap_or_else(|| vec![Msg::Quit]);
            for m in batch {
                tx.send(m).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.flushed += frame.cells.len();
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn context_clones_share_flag() {
        let a = Context::new();
        let b = a.clone();
        assert!(!b.is_done());
        a.cancel();
        assert!(b.is_done());
    }

    #[test]
    fn app_runs_until_model_ends() {
        let driver = Scripted::new(vec![
            vec![],
            vec![Msg::key(Key::Char('p'))],
            vec![Msg::key(Key::Char('q'))],
            vec![Msg::key(Key::Char('z'))],
        ]);
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 4,
            height: 2,
        });
        app.run().unwrap();
        assert_eq!(app.model.keys, vec!['p', 'q']);
        assert_eq!(app.model.ticks, 2);
        assert!(app.driver.closed);
        assert!(app.driver.flushed > 0);
    }

    #[test]
    fn quit_message_stops_loop() {
        let driver = Scripted::new(vec![vec![Msg::Quit]]);
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 2,
            height: 1,
        });
        app.run().unwrap();
        assert_eq!(app.model.ticks, 0);
    }

    #[test]
    fn messages_after_end_are_dropped() {
        let driver = Scripted::new(vec![vec![
            Msg::key(Key::Char('a')),
            Msg::key(Key::Char('q')),
            Msg::key(Key::Char('b')),
        ]]);
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver,
            width: 2,
            height: 1,
        });
        app.run().unwrap();
        assert_eq!(app.model.keys, vec!['a', 'q']);
        assert!(matches!(Counter::default().update(Msg::key(Key::Char('q'))), Some(Effect::End)));
        assert!(app.driver.closed);
    }
}
