use std::time::{Duration, Instant};

use crate::cities;
use crate::map::{MapRenderer, RotatedMercator};
use crate::view::{interpolate, DragAnchor, ViewState, PAN_STEP, ROLL_STEP};

/// Clicks are ignored for this long after a drag release, so letting go
/// of a drag is never mistaken for a click.
pub const CLICK_COOLDOWN: Duration = Duration::from_millis(100);
/// A resize burst settles for this long before the canvas is rebuilt.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
/// Animated re-center transitions run for this long.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(1000);
/// Transient status messages expire after this long.
const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Where keyboard input goes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    Normal,
    /// The search box has focus; pan/roll/quit keys are not interpreted.
    Search,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// An in-flight animated transition between two view states. The target
/// state is already committed to `App::view`; only the rendered view
/// lags behind.
struct Transition {
    from: ViewState,
    to: ViewState,
    started: Instant,
}

/// Application state. All mutation happens synchronously inside a single
/// event-handler call; `App` is the only owner of the view state.
pub struct App {
    /// Committed view state (the target of any running transition).
    pub view: ViewState,
    /// View state actually rendered this frame.
    pub displayed: ViewState,
    pub map_renderer: MapRenderer,
    /// Set when boundary data failed to load; the map stays uninitialized
    /// and the UI shows a static error panel instead.
    pub load_error: Option<String>,
    pub mode: InputMode,
    pub search: String,
    pub theme: Theme,
    pub should_quit: bool,
    /// Canvas dot dimensions (2x4 per character cell).
    pub pixel_width: usize,
    pub pixel_height: usize,
    transition: Option<Transition>,
    drag: Option<DragAnchor>,
    drag_moved: bool,
    click_block_until: Option<Instant>,
    pending_resize: Option<(usize, usize, Instant)>,
    message: Option<(String, Instant)>,
}

impl App {
    pub fn new(width: usize, height: usize) -> Self {
        let (pixel_width, pixel_height) = canvas_pixels(width, height);
        Self {
            view: ViewState::default(),
            displayed: ViewState::default(),
            map_renderer: MapRenderer::new(),
            load_error: None,
            mode: InputMode::Normal,
            search: String::new(),
            theme: Theme::Dark,
            should_quit: false,
            pixel_width,
            pixel_height,
            transition: None,
            drag: None,
            drag_moved: false,
            click_block_until: None,
            pending_resize: None,
            message: None,
        }
    }

    /// The projection matching the committed view state. Input inversion
    /// always goes through this one; rendering projects through
    /// `displayed`, which lags during an animated transition.
    pub fn projection(&self) -> RotatedMercator {
        RotatedMercator::from_view(&self.view, self.pixel_width, self.pixel_height)
    }

    /// Per-frame bookkeeping: settle debounced resizes, advance the
    /// animated transition, expire stale messages.
    pub fn tick(&mut self, now: Instant) {
        if let Some((width, height, deadline)) = self.pending_resize {
            if now >= deadline {
                let (pw, ph) = canvas_pixels(width, height);
                self.pixel_width = pw;
                self.pixel_height = ph;
                self.pending_resize = None;
            }
        }

        match &self.transition {
            Some(t) => {
                let elapsed = now.saturating_duration_since(t.started);
                if elapsed >= TRANSITION_DURATION {
                    self.displayed = self.view;
                    self.transition = None;
                } else {
                    let t_frac = elapsed.as_secs_f64() / TRANSITION_DURATION.as_secs_f64();
                    self.displayed = interpolate(&t.from, &t.to, t_frac);
                }
            }
            None => self.displayed = self.view,
        }

        if let Some((_, shown_at)) = self.message {
            if now.saturating_duration_since(shown_at) >= MESSAGE_TTL {
                self.message = None;
            }
        }
    }

    /// A resize supersedes any pending one; the canvas is rebuilt only
    /// after the burst goes quiet.
    pub fn schedule_resize(&mut self, width: usize, height: usize, now: Instant) {
        self.pending_resize = Some((width, height, now + RESIZE_DEBOUNCE));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    fn set_message(&mut self, text: impl Into<String>, now: Instant) {
        self.message = Some((text.into(), now));
    }

    // --- view-state operations ---

    /// Animated re-center on a geographic point.
    pub fn center_on(&mut self, lon: f64, lat: f64, now: Instant) {
        let target = self.view.centered_on(lon, lat);
        self.start_transition(target, now);
    }

    /// Animated move to an explicit rotation pole.
    pub fn set_pole(&mut self, lon: f64, lat: f64, now: Instant) {
        let target = self.view.with_pole(lon, lat);
        self.start_transition(target, now);
    }

    /// Keyboard pan: immediate, no animation.
    pub fn pan(&mut self, dlon: f64, dlat: f64) {
        self.view = self.view.panned(dlon, dlat);
        self.set_immediate();
    }

    /// Keyboard roll: immediate, no animation.
    pub fn roll(&mut self, delta: f64) {
        self.view = self.view.rolled(delta);
        self.set_immediate();
    }

    /// Animated reset to the home view; also clears the search box.
    pub fn reset(&mut self, now: Instant) {
        self.search.clear();
        self.start_transition(ViewState::default(), now);
    }

    fn start_transition(&mut self, target: ViewState, now: Instant) {
        self.transition = Some(Transition {
            from: self.displayed,
            to: target,
            started: now,
        });
        self.view = target;
    }

    /// Commit the current state and cancel any running animation.
    fn set_immediate(&mut self) {
        self.transition = None;
        self.displayed = self.view;
    }

    // --- mouse ---

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        // A press on a pixel that does not invert (outside the projected
        // world strip) is silently ignored.
        if let Some(coords) = self.projection().invert(px, py) {
            self.drag = Some(DragAnchor {
                pole: self.view.pole,
                coords,
            });
            self.drag_moved = false;
        }
    }

    pub fn mouse_drag(&mut self, col: u16, row: u16) {
        let Some(anchor) = self.drag else { return };
        let (px, py) = cell_to_pixel(col, row);
        if let Some(coords) = self.projection().invert(px, py) {
            self.view = self.view.dragged(&anchor, coords);
            self.drag_moved = true;
            self.set_immediate();
        }
    }

    pub fn mouse_up(&mut self, col: u16, row: u16, now: Instant) {
        let pressed = self.drag.take().is_some();
        if self.drag_moved {
            // Drag release: start the cooldown window so the release is
            // not treated as a click.
            self.drag_moved = false;
            self.click_block_until = Some(now + CLICK_COOLDOWN);
            return;
        }
        if !pressed {
            return;
        }
        if let Some(until) = self.click_block_until {
            if now < until {
                return;
            }
        }
        let (px, py) = cell_to_pixel(col, row);
        if let Some((lon, lat)) = self.projection().invert(px, py) {
            self.center_on(lon, lat, now);
        }
    }

    // --- keyboard / search ---

    pub fn pan_step(&mut self, dlon_steps: f64, dlat_steps: f64) {
        self.pan(dlon_steps * PAN_STEP, dlat_steps * PAN_STEP);
    }

    pub fn roll_step(&mut self, steps: f64) {
        self.roll(steps * ROLL_STEP);
    }

    pub fn open_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn cancel_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn search_backspace(&mut self) {
        let _ = self.search.pop();
    }

    /// Submit the search box: a known city centers the view (and the box
    /// echoes the canonical name back); a "lon, lat" pair is taken as an
    /// explicit rotation pole; anything else reports not-found with no
    /// state change.
    pub fn submit_search(&mut self, now: Instant) {
        self.mode = InputMode::Normal;
        if let Some((lon, lat)) = cities::lookup(&self.search) {
            if let Some(name) = cities::display_name(&self.search) {
                self.search = name;
            }
            self.center_on(lon, lat, now);
        } else if let Some((lon, lat)) = parse_pole(&self.search) {
            self.set_pole(lon, lat, now);
        } else {
            self.set_message(
                "City not found. Try: Tokyo, Paris, Cairo, New York, Sydney...",
                now,
            );
        }
    }

    // --- readouts ---

    /// Current view center in degrees with hemisphere letters, latitude
    /// first, two decimals: "48.86°N, 2.35°E".
    pub fn center_readout(&self) -> String {
        let (lon, lat) = self.view.center();
        format!(
            "{:.2}°{}, {:.2}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" },
        )
    }

    pub fn roll_readout(&self) -> String {
        format!("{:.0}°", self.view.roll)
    }
}

/// Inner canvas dot dimensions for a terminal of `width` x `height`
/// cells: border takes 2 columns and 2 rows, the status bar one more row.
fn canvas_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Terminal cell to braille dot coordinates, accounting for the border.
fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
    let px = (col.saturating_sub(1)) as i32 * 2;
    let py = (row.saturating_sub(1)) as i32 * 4;
    (px, py)
}

/// Accept "lon, lat" or "lon lat" as an explicit rotation pole.
fn parse_pole(input: &str) -> Option<(f64, f64)> {
    let mut parts = input
        .trim()
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let lon: f64 = parts.next()?.parse().ok()?;
    let lat: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    Some((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::normalize_lon;
    use crate::view::Pole;

    fn test_app() -> App {
        App::new(80, 24)
    }

    #[test]
    fn search_hit_centers_and_echoes_name() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.open_search();
        for c in "  TOKYO ".chars() {
            app.search_push(c);
        }
        app.submit_search(t0);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.search, "Tokyo");
        assert_eq!(app.view.pole.lon, normalize_lon(-139.6917));
        assert_eq!(app.view.pole.lat, 35.6895);
        assert!(app.message().is_none());
    }

    #[test]
    fn search_miss_reports_and_leaves_state() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.open_search();
        for c in "Atlantis".chars() {
            app.search_push(c);
        }
        app.submit_search(t0);
        assert_eq!(app.view.pole, Pole { lon: 0.0, lat: 0.0 });
        assert!(app.message().is_some());
    }

    #[test]
    fn search_coordinate_pair_sets_pole() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.search = "30, 40".to_string();
        app.submit_search(t0);
        assert_eq!(app.view.pole, Pole { lon: 30.0, lat: -40.0 });
    }

    #[test]
    fn message_expires() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.search = "nowhere".to_string();
        app.submit_search(t0);
        assert!(app.message().is_some());
        app.tick(t0 + Duration::from_secs(5));
        assert!(app.message().is_none());
    }

    #[test]
    fn click_centers_on_point() {
        let mut app = test_app();
        let t0 = Instant::now();
        // Press and release at the same cell: a click.
        app.mouse_down(20, 10);
        app.mouse_up(20, 10, t0);
        // The committed view re-centered on the inverted coordinate.
        let expected = {
            let fresh = test_app();
            let (px, py) = cell_to_pixel(20, 10);
            let (lon, lat) = fresh.projection().invert(px, py).expect("on-map pixel");
            fresh.view.centered_on(lon, lat)
        };
        assert_eq!(app.view, expected);
    }

    #[test]
    fn drag_release_blocks_the_following_click() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.mouse_down(20, 10);
        app.mouse_drag(24, 10);
        let after_drag = app.view;
        app.mouse_up(24, 10, t0);

        // A click inside the cooldown window does nothing.
        app.mouse_down(30, 12);
        app.mouse_up(30, 12, t0 + Duration::from_millis(50));
        assert_eq!(app.view, after_drag);

        // After the cooldown it works again.
        app.mouse_down(30, 12);
        app.mouse_up(30, 12, t0 + Duration::from_millis(200));
        assert_ne!(app.view, after_drag);
    }

    #[test]
    fn drag_at_start_pixel_is_identity() {
        let mut app = test_app();
        app.mouse_down(20, 10);
        // The first drag event at the press position inverts to the
        // anchor coordinate itself: zero delta, pole untouched.
        app.mouse_drag(20, 10);
        assert_eq!(app.view, ViewState::default());
        app.mouse_drag(26, 10);
        assert_ne!(app.view, ViewState::default());
    }

    #[test]
    fn transition_animates_then_settles() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.center_on(139.6917, 35.6895, t0);
        // Committed state jumps immediately; the displayed state eases.
        assert_eq!(app.view.pole.lat, 35.6895);
        app.tick(t0 + Duration::from_millis(1));
        assert!(app.displayed.pole.lat < 1.0);
        app.tick(t0 + Duration::from_millis(500));
        let mid = app.displayed.pole.lat;
        assert!(mid > 0.0 && mid < 35.6895);
        app.tick(t0 + TRANSITION_DURATION);
        assert_eq!(app.displayed, app.view);
    }

    #[test]
    fn keyboard_input_cancels_transition() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.center_on(100.0, 20.0, t0);
        app.pan_step(1.0, 0.0);
        app.tick(t0 + Duration::from_millis(10));
        assert_eq!(app.displayed, app.view);
    }

    #[test]
    fn pan_step_is_five_degrees() {
        let mut app = test_app();
        app.pan_step(1.0, 0.0);
        assert_eq!(app.view.pole.lon, 5.0);
        app.pan_step(0.0, -1.0);
        assert_eq!(app.view.pole.lat, -5.0);
    }

    #[test]
    fn reset_restores_home_and_clears_search() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.search = "Tokyo".to_string();
        app.center_on(139.6917, 35.6895, t0);
        app.roll_step(3.0);
        app.reset(t0 + Duration::from_millis(10));
        assert_eq!(app.view, ViewState::default());
        assert!(app.search.is_empty());
        app.tick(t0 + Duration::from_millis(10) + TRANSITION_DURATION);
        assert_eq!(app.displayed, ViewState::default());
    }

    #[test]
    fn resize_is_debounced_and_superseded() {
        let mut app = test_app();
        let t0 = Instant::now();
        let before = (app.pixel_width, app.pixel_height);

        app.schedule_resize(100, 50, t0);
        app.tick(t0 + Duration::from_millis(100));
        assert_eq!((app.pixel_width, app.pixel_height), before);

        // A newer resize supersedes the pending one.
        app.schedule_resize(120, 40, t0 + Duration::from_millis(200));
        app.tick(t0 + Duration::from_millis(300));
        assert_eq!((app.pixel_width, app.pixel_height), before);

        app.tick(t0 + Duration::from_millis(500));
        assert_eq!((app.pixel_width, app.pixel_height), ((120 - 2) * 2, (40 - 3) * 4));
    }

    #[test]
    fn readout_formats_hemispheres() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.center_on(2.3522, 48.8566, t0);
        assert_eq!(app.center_readout(), "48.86°N, 2.35°E");
        app.center_on(-58.3816, -34.6037, t0);
        assert_eq!(app.center_readout(), "34.60°S, 58.38°W");
    }

    #[test]
    fn reset_readout_is_origin() {
        let mut app = test_app();
        app.reset(Instant::now());
        assert_eq!(app.center_readout(), "0.00°N, 0.00°E");
    }

    #[test]
    fn parse_pole_accepts_pairs_only() {
        assert_eq!(parse_pole("30, 40"), Some((30.0, 40.0)));
        assert_eq!(parse_pole(" -12.5 7.25 "), Some((-12.5, 7.25)));
        assert_eq!(parse_pole("30"), None);
        assert_eq!(parse_pole("30 40 50"), None);
        assert_eq!(parse_pole("tokyo"), None);
    }
}
