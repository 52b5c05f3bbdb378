//! widget-demo - one of every widget on a full-screen terminal.
//!
//! Usage: `widget-demo [config.toml]` (defaults to `widgets.toml`, which may
//! be absent). Press the configured quit key (Ctrl+Q by default) to exit.

use std::fs::File;
use std::sync::Mutex;

use spark_widgets::widgets::{Button, CheckboxList, Label, SelectionList, TextEditor};
use spark_widgets::{
    CrosstermSource, DispatchEngine, Rect, Result, Rgba, Runtime, RuntimeConfig, Screen,
    TerminalBackend, Widget,
};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &RuntimeConfig) -> Result<()> {
    // Never log to the terminal we are drawing on.
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_widgets(screen: &Screen, config: &RuntimeConfig) -> DispatchEngine {
    let mut engine = DispatchEngine::with_colors(config.default_colors());
    let options = ["Option 1", "Option 2", "Option 3"];

    let choices = SelectionList::new(screen, Rect::new(5, 10, 20, 10), "Choose One", options);

    let label = Label::new(screen, Rect::new(8, 3, 10, 1), "Label testing!");

    let mut button = Button::new(screen, Rect::new(5, 5, 20, 4), "Click Me!");
    let caption = button.caption_handle();
    button.on_press(move || *caption.borrow_mut() = "Button pressed!".to_string());
    let caption = button.caption_handle();
    button.on_release(move || *caption.borrow_mut() = "Button clicked!".to_string());

    let checkboxes = CheckboxList::new(screen, Rect::new(30, 2, 20, 8), "options", options);

    let mut editor = TextEditor::new(screen, Rect::new(50, 5, 20, 10), "");
    editor.set_scrollbars(true, true);

    let list = engine.add(choices);
    engine.add(button);
    engine.add(checkboxes);
    engine.add(editor);
    engine.add(label);

    // Red on white, over the default pair add() registered.
    if let Some(widget) = engine.widget_mut(list) {
        widget.set_colors(Rgba::RED, Rgba::WHITE);
    }
    engine
}

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "widgets.toml".to_string());
    // The subscriber comes from the config, so report the fallback afterwards.
    let found = RuntimeConfig::read(&path)?;
    let missing = found.is_none();
    let config = found.unwrap_or_default();
    init_logging(&config)?;
    if missing {
        tracing::warn!("config not found at {path}, using defaults");
    } else {
        tracing::info!("loaded config from {path}");
    }

    let (width, height) = TerminalBackend::size()?;
    let screen = Screen::new(width, height);
    let engine = build_widgets(&screen, &config);

    let backend = TerminalBackend::enter(&config)?;
    let mut runtime = Runtime::new(screen, engine, CrosstermSource::new(), backend, &config)?;
    runtime.run()
}
