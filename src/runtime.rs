//! Runtime - the single-threaded event loop.
//!
//! One tick polls the event source once. An event is dispatched and the
//! resulting frame presented; an empty tick changes nothing and polls again.
//! The loop ends when the quit key arrives, when the [`ShutdownSignal`] is
//! raised, or when the event source is finished.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::config::RuntimeConfig;
use crate::dispatch::DispatchEngine;
use crate::error::Result;
use crate::input::{EventSource, InputEvent, Key};
use crate::surface::Screen;

// =============================================================================
// SHUTDOWN
// =============================================================================

/// Cloneable stop flag, safe to raise from another thread.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// RUNTIME
// =============================================================================

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No event arrived.
    Idle,
    /// An event was dispatched and the frame presented.
    Handled,
    /// The quit key arrived.
    Quit,
}

pub struct Runtime<S, B> {
    screen: Screen,
    engine: DispatchEngine,
    source: S,
    backend: B,
    quit_key: Key,
    poll_interval: Duration,
    bell: bool,
    shutdown: ShutdownSignal,
}

impl<S: EventSource, B: Backend> Runtime<S, B> {
    pub fn new(
        screen: Screen,
        engine: DispatchEngine,
        source: S,
        backend: B,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        Ok(Self {
            screen,
            engine,
            source,
            backend,
            quit_key: config.quit_key()?,
            poll_interval: config.poll_interval(),
            bell: config.bell,
            shutdown: ShutdownSignal::new(),
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DispatchEngine {
        &mut self.engine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Handle for stopping [`Runtime::run`] from elsewhere.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Publish every widget and show the result, then ring the bell if a
    /// widget asked for it and the bell is enabled.
    pub fn present(&mut self) -> Result<()> {
        self.engine.refresh_all();
        {
            let frame = self.screen.visible();
            self.backend.present(&frame, self.screen.cursor())?;
        }
        if self.screen.take_bell() && self.bell {
            self.backend.bell()?;
        }
        Ok(())
    }

    /// Poll once and handle what arrives.
    pub fn step(&mut self) -> Result<Tick> {
        let Some(event) = self.source.poll(self.poll_interval) else {
            return Ok(Tick::Idle);
        };

        if event == InputEvent::Key(self.quit_key) {
            tracing::debug!(key = %self.quit_key, "quit key");
            return Ok(Tick::Quit);
        }

        tracing::trace!(?event, "dispatch");
        self.engine.handle_event(&event);
        self.present()?;
        Ok(Tick::Handled)
    }

    /// Present the initial frame, then tick until told to stop.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(widgets = self.engine.len(), "runtime started");
        self.present()?;

        let mut handled = 0u64;
        loop {
            if self.shutdown.is_raised() {
                tracing::info!("shutdown requested");
                break;
            }
            match self.step()? {
                Tick::Quit => break,
                Tick::Handled => handled += 1,
                Tick::Idle if self.source.is_finished() => {
                    tracing::debug!("event source finished");
                    break;
                }
                Tick::Idle => {}
            }
        }

        tracing::info!(handled, "runtime stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::input::{PointerEvent, ScriptedSource};
    use crate::types::Rect;
    use crate::widgets::{Label, TextEditor};

    fn runtime(source: ScriptedSource) -> Runtime<ScriptedSource, HeadlessBackend> {
        let screen = Screen::new(30, 6);
        let mut engine = DispatchEngine::new();
        engine.add(Label::new(&screen, Rect::new(0, 0, 10, 1), "title"));
        engine.add(TextEditor::new(&screen, Rect::new(0, 1, 20, 4), ""));
        Runtime::new(screen, engine, source, HeadlessBackend::new(), &RuntimeConfig::default()).unwrap()
    }

    #[test]
    fn test_step_idle_does_not_present() {
        let mut source = ScriptedSource::new();
        source.push_idle();
        let mut rt = runtime(source);
        assert_eq!(rt.step().unwrap(), Tick::Idle);
        assert_eq!(rt.backend().frames(), 0);
    }

    #[test]
    fn test_quit_key_is_consumed() {
        let mut source = ScriptedSource::new();
        source
            .push(PointerEvent::press(2, 2))
            .push(Key::Ctrl('q'))
            .push(Key::Char('x'));
        let mut rt = runtime(source);
        rt.run().unwrap();

        // initial frame + the click
        assert_eq!(rt.backend().frames(), 2);
        assert_eq!(rt.source_mut().remaining(), 1);
        let frame = rt.backend().last_frame().unwrap();
        assert_eq!(frame.row_text(1).trim_end(), "");
    }

    #[test]
    fn test_typing_reaches_focused_editor() {
        let mut source = ScriptedSource::new();
        source.push(PointerEvent::press(3, 2));
        for c in "hi".chars() {
            source.push(Key::Char(c));
        }
        let mut rt = runtime(source);
        rt.run().unwrap();

        let frame = rt.backend().last_frame().unwrap();
        assert_eq!(frame.row_text(0).trim_end(), "title");
        assert!(frame.row_text(1).starts_with("hi"));
        assert_eq!(rt.backend().cursor(), Some((2, 1)));
    }

    #[test]
    fn test_bell_only_when_enabled() {
        let events = || {
            let mut source = ScriptedSource::new();
            source
                .push(PointerEvent::press(3, 2))
                .push(Key::Enter)
                .push(Key::Backspace)
                .push(PointerEvent::press(29, 5));
            source
        };

        let mut quiet = runtime(events());
        quiet.run().unwrap();
        assert_eq!(quiet.backend().bells(), 0);

        let screen = Screen::new(30, 6);
        let mut engine = DispatchEngine::new();
        engine.add(TextEditor::new(&screen, Rect::new(0, 1, 20, 4), ""));
        let config = RuntimeConfig { bell: true, ..RuntimeConfig::default() };
        let mut loud = Runtime::new(screen, engine, events(), HeadlessBackend::new(), &config).unwrap();
        loud.run().unwrap();
        // the hit and the line merge; the miss is silent
        assert_eq!(loud.backend().bells(), 2);
    }

    #[test]
    fn test_shutdown_signal_stops_run() {
        let mut source = ScriptedSource::new();
        source.push_idle().push_idle();
        let mut rt = runtime(source);
        rt.shutdown_signal().raise();
        rt.run().unwrap();
        assert_eq!(rt.source_mut().remaining(), 2);
        assert_eq!(rt.backend().frames(), 1);
    }
}
