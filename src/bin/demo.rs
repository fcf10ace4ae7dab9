//! Interactive demo: a couple of overlay windows, a settings window
//! materialized from the config registry, and a few key chords.
//!
//! Run in a terminal that reports mouse events. `Ctrl+Q` quits,
//! `Ctrl+O` opens settings, windows drag by their title bar.

use std::cell::Cell;
use std::io::stdout;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use mallet::{
    ButtonSpec, ConfigDescriptor, FileStore, LabelSpec, MemoryStore, TextSpec, Toolkit,
    WindowOptions,
};

#[derive(Parser)]
#[command(name = "mallet-demo", about = "Overlay window toolkit demo")]
struct Args {
    /// Where to persist window + config state (defaults to the platform
    /// data directory).
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Skip persistence entirely; state dies with the process.
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut toolkit = build_toolkit(&args);
    let quit = Rc::new(Cell::new(false));
    let open_settings = Rc::new(Cell::new(false));

    register_settings(&mut toolkit, &open_settings);
    let quit_flag = quit.clone();
    toolkit.register_keybinding("Ctrl+Q", move |_| quit_flag.set(true));

    if args.ephemeral {
        spawn_welcome_window(&mut toolkit, &open_settings);
    } else {
        toolkit.load_persistent_state();
        if toolkit.windows().open_count() == 0 {
            spawn_welcome_window(&mut toolkit, &open_settings);
        }
    }

    enable_raw_mode()?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    if enhanced {
        crossterm::execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut toolkit, &quit, &open_settings);

    toolkit.shutdown();
    if enhanced {
        let _ = crossterm::execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = crossterm::execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    toolkit: &mut Toolkit,
    quit: &Rc<Cell<bool>>,
    open_settings: &Rc<Cell<bool>>,
) -> Result<()> {
    while !quit.get() {
        if open_settings.replace(false) {
            toolkit.generate_config_window(WindowOptions::titled("Settings").size(52, 16));
        }
        terminal.draw(|frame| toolkit.draw(frame))?;
        if crossterm::event::poll(Duration::from_millis(100))? {
            let event = crossterm::event::read()?;
            toolkit.handle_event(&event);
        }
    }
    Ok(())
}

fn build_toolkit(args: &Args) -> Toolkit {
    if args.ephemeral {
        return Toolkit::with_store(Box::new(MemoryStore::new()));
    }
    match &args.state_file {
        Some(path) => Toolkit::with_store(Box::new(FileStore::open(path))),
        None => Toolkit::new(),
    }
}

fn register_settings(toolkit: &mut Toolkit, open_settings: &Rc<Cell<bool>>) {
    toolkit.register_config_value(
        ConfigDescriptor::checkbox("demo.borders", true)
            .display("Fancy borders")
            .description("Draw windows with rounded corners"),
    );
    toolkit.register_config_value(
        ConfigDescriptor::color("demo.accent", "#89b4fa")
            .display("Accent color")
            .description("Chrome highlight color"),
    );
    toolkit.register_config_value(
        ConfigDescriptor::number("demo.opacity", 0.4, 0.0, 1.0, 0.1)
            .display("Ghost opacity")
            .description("How faint a ghosted window looks"),
    );
    toolkit.register_config_value(
        ConfigDescriptor::dropdown(
            "demo.position",
            "centered",
            vec!["top-left".into(), "remembered".into()],
        )
        .display("New window placement"),
    );
    let flag = open_settings.clone();
    toolkit.register_config_value(
        ConfigDescriptor::hotkey("demo.settings-hotkey", "Ctrl+O", move |_| flag.set(true))
            .display("Open settings")
            .description("Chord that opens the settings window"),
    );
}

fn spawn_welcome_window(toolkit: &mut Toolkit, open_settings: &Rc<Cell<bool>>) {
    let Some(key) = toolkit.generate_modal_window(
        WindowOptions::titled("Welcome").size(44, 10),
    ) else {
        return;
    };
    let flag = open_settings.clone();
    let Some(builder) = toolkit.windows_mut().content(key) else {
        return;
    };
    builder
        .label(LabelSpec {
            text: "Drag me by the title bar.".into(),
            ..Default::default()
        })
        .newline()
        .text_input(TextSpec {
            id: "note".into(),
            value: "click to edit".into(),
            ..Default::default()
        })
        .newline()
        .button(ButtonSpec {
            text: "Open settings".into(),
            on_press: Some(Rc::new(move || flag.set(true))),
            ..Default::default()
        });
}
