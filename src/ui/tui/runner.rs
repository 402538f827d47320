use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde_json::Value;

use crate::infrastructure::event_log::{
    Event as LogEvent, EventLogger, FileEventLogger, NullEventLogger,
};
use crate::infrastructure::store::Store;

use super::model::TallyApp;
use super::update::{handle_key, handle_resize, tick};
use super::view;

#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    pub forced_narrow: bool,
    pub event_log_path: Option<PathBuf>,
}

pub fn run_tui(store: Store, options: TuiOptions) -> std::io::Result<()> {
    let event_log: Arc<dyn EventLogger> = match options.event_log_path.as_ref() {
        Some(path) => Arc::new(FileEventLogger::open(path)?),
        None => Arc::new(NullEventLogger),
    };
    event_log.log(
        LogEvent::new("hub_shell", "started")
            .with_data("forced_narrow", Value::from(options.forced_narrow)),
    );

    let mut app = TallyApp::new(store, Arc::clone(&event_log), options.forced_narrow);
    let mut terminal = init_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app);
    let cleanup = restore_terminal(&mut terminal);

    event_log.log(LogEvent::new("hub_shell", "stopped"));
    outcome.and(cleanup)
}

fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut TallyApp,
) -> io::Result<()> {
    app.viewport_width = terminal.size()?.width;

    while !app.should_quit {
        let model = app.frame_model();
        terminal.draw(|frame| view::draw(frame, &model))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Resize(width, _) => handle_resize(app, width),
                _ => {}
            }
        } else {
            tick(app);
        }
    }

    Ok(())
}
