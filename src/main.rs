use anyhow::Result;
use mapspin::app::{App, InputMode};
use mapspin::{data, ui};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events: click to center, drag to rotate
fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.mouse_down(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.mouse_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.mouse_up(mouse.column, mouse.row, now);
        }
        _ => {}
    }
}

/// Handle a key press while the search box has focus
fn handle_search_key(app: &mut App, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Enter => app.submit_search(now),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

/// Handle a key press in normal mode
fn handle_key(app: &mut App, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Arrow keys move the pole; a/d pan longitude as well
        KeyCode::Up => app.pan_step(0.0, 1.0),
        KeyCode::Down => app.pan_step(0.0, -1.0),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => app.pan_step(-1.0, 0.0),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => app.pan_step(1.0, 0.0),

        // w/s roll the view
        KeyCode::Char('w') | KeyCode::Char('W') => app.roll_step(1.0),
        KeyCode::Char('s') | KeyCode::Char('S') => app.roll_step(-1.0),

        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset(now),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize);

    // Load the world boundary dataset; failure leaves the map
    // uninitialized and the UI shows an error panel instead.
    let data_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("data"), PathBuf::from);
    if let Err(e) = data::load_world(&mut app.map_renderer, &data_dir) {
        app.load_error = Some(format!("{e:#}"));
    }

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        if app.mode == InputMode::Search {
                            handle_search_key(&mut app, key.code, now);
                        } else {
                            handle_key(&mut app, key.code, now);
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    // No map to hit-test against until data has loaded
                    if app.load_error.is_none() {
                        handle_mouse(&mut app, mouse, now);
                    }
                }
                Event::Resize(width, height) => {
                    app.schedule_resize(width as usize, height as usize, now);
                }
                _ => {}
            }
        }

        // Advance animations, debounced resizes, message expiry
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
