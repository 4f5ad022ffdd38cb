use crate::app::{App, InputMode, Theme};
use crate::braille::BrailleCanvas;
use crate::map::{MapLayers, RotatedMercator};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Per-theme color palette for the map layers and chrome.
struct Palette {
    border: Color,
    title: Color,
    graticule: Color,
    land: Color,
    label: Color,
    accent: Color,
    error: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            border: Color::DarkGray,
            title: Color::Cyan,
            graticule: Color::DarkGray,
            land: Color::Cyan,
            label: Color::Gray,
            accent: Color::Yellow,
            error: Color::Red,
        },
        Theme::Light => Palette {
            border: Color::Gray,
            title: Color::Blue,
            graticule: Color::Gray,
            land: Color::Blue,
            label: Color::DarkGray,
            accent: Color::Magenta,
            error: Color::LightRed,
        },
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.theme);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(Span::styled(
            " World Map ",
            Style::default()
                .fg(colors.title)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Map-data load failure is terminal: a static error message takes
    // the map's place.
    if let Some(error) = &app.load_error {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Error loading map data.",
                Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(error.as_str(), Style::default().fg(colors.label))),
        ])
        .centered();
        frame.render_widget(message, inner);
        return;
    }

    // Render through the animated (displayed) view at the actual inner
    // dimensions; 2x4 braille dots per cell.
    let proj = RotatedMercator::from_view(
        &app.displayed,
        inner.width as usize * 2,
        inner.height as usize * 4,
    );

    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &proj);

    let map_widget = MapWidget {
        layers,
        graticule_color: colors.graticule,
        land_color: colors.land,
    };
    frame.render_widget(map_widget, inner);
}

/// Widget blitting the braille layers back-to-front with per-layer colors.
struct MapWidget {
    layers: MapLayers,
    graticule_color: Color,
    land_color: Color,
}

impl MapWidget {
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_layer(&self.layers.graticule, self.graticule_color, area, buf);
        self.render_layer(&self.layers.land, self.land_color, area, buf);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.theme);

    let status = if app.mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" Search city: ", Style::default().fg(colors.accent)),
            Span::styled(app.search.as_str(), Style::default().fg(colors.title)),
            Span::styled("▏", Style::default().fg(colors.accent)),
            Span::styled(
                "  Enter:go Esc:cancel",
                Style::default().fg(colors.label),
            ),
        ])
    } else if let Some(message) = app.message() {
        Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(message, Style::default().fg(colors.error)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" Center: ", Style::default().fg(colors.label)),
            Span::styled(app.center_readout(), Style::default().fg(colors.title)),
            Span::styled("  Roll: ", Style::default().fg(colors.label)),
            Span::styled(app.roll_readout(), Style::default().fg(colors.accent)),
            Span::styled(
                "  | click:center drag:rotate arrows/ad:pan ws:roll /:search r:reset t:theme q:quit",
                Style::default().fg(colors.label),
            ),
        ])
    };

    frame.render_widget(Paragraph::new(status), area);
}
