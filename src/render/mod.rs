//! Frame painting for the window set: back-to-front window chrome, inline
//! control flow inside each content area, and the hit-region table that
//! mouse routing consumes on the next event.

pub mod theme;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::window::{Control, Region, RegionKind, WindowManager};

pub use theme::{Theme, parse_hex_color};

/// Paint every live window and rebuild the manager's hit regions.
///
/// Windows are drawn in creation order with the front-marked window last,
/// so it overpaints the rest; later regions therefore win reverse-order
/// hit testing. Windows that still have unresolved (centered) placement
/// are resolved against the frame area first, and keep that position.
pub fn draw(frame: &mut Frame, manager: &mut WindowManager, theme: &Theme) {
    let area = frame.area();
    manager.resolve_geometry(area);

    let mut regions: Vec<Region> = Vec::new();
    for key in manager.paint_order() {
        let Some(record) = manager.get(key) else {
            continue;
        };
        let Some((x, y)) = record.position() else {
            continue;
        };
        let (width, height) = record.size();
        let rect = Rect::new(x.max(0) as u16, y.max(0) as u16, width, height).intersection(area);
        if rect.width < 8 || rect.height < 2 {
            continue;
        }
        let ghosted = record.is_ghosted();
        let options = record.options().clone();

        frame.render_widget(Clear, rect);
        let border_style = dim_if(
            Style::default().fg(if record.is_front() {
                theme.border_primary
            } else {
                theme.border_secondary
            }),
            ghosted,
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(Span::styled(
                record.title().to_string(),
                dim_if(Style::default().fg(theme.text_primary), ghosted),
            )))
            .style(Style::default().bg(theme.bg_surface));
        frame.render_widget(block, rect);

        regions.push(Region {
            window: key,
            rect,
            kind: RegionKind::Body,
        });

        // Content flows inline; a newline control breaks the row, like the
        // line breaks the builder emits between label/input pairs.
        let inner = Rect::new(
            rect.x + 1,
            rect.y + 1,
            rect.width.saturating_sub(2),
            rect.height.saturating_sub(2),
        );
        let mut row: u16 = 0;
        let mut col: u16 = 0;
        for (index, item) in record.content().iter().enumerate() {
            if item.hidden {
                continue;
            }
            if matches!(item.control, Control::Newline) {
                row += 1;
                col = 0;
                continue;
            }
            let capturing = manager.capturing_at(key, index);
            let editing = manager.editing_at(key, index);
            let spans = control_spans(&item.control, capturing, editing, ghosted, theme);
            let line = Line::from(spans);
            let line_width = line.width() as u16;
            if line_width == 0 {
                continue;
            }
            if col > 0 && col + line_width > inner.width {
                row += 1;
                col = 0;
            }
            if row >= inner.height {
                break;
            }
            let control_rect = Rect::new(
                inner.x + col,
                inner.y + row,
                line_width.min(inner.width.saturating_sub(col)),
                1,
            );
            if control_rect.width == 0 {
                continue;
            }
            frame.render_widget(Paragraph::new(line), control_rect);
            regions.push(Region {
                window: key,
                rect: control_rect,
                kind: RegionKind::Control(index),
            });
            col += line_width + 1;
        }

        // Header strip sits on the top border row; buttons overpaint its
        // right end and win hit testing by being pushed later.
        regions.push(Region {
            window: key,
            rect: Rect::new(rect.x, rect.y, rect.width, 1),
            kind: RegionKind::Header,
        });
        let mut button_x = rect.x + rect.width - 4;
        if options.enable_close_button {
            let close_rect = Rect::new(button_x, rect.y, 3, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "[x]",
                    dim_if(Style::default().fg(theme.accent_error), ghosted),
                )),
                close_rect,
            );
            regions.push(Region {
                window: key,
                rect: close_rect,
                kind: RegionKind::CloseButton,
            });
            button_x = button_x.saturating_sub(4);
        }
        if options.enable_ghost_button {
            let ghost_rect = Rect::new(button_x, rect.y, 3, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "[~]",
                    dim_if(Style::default().fg(theme.accent_secondary), ghosted),
                )),
                ghost_rect,
            );
            regions.push(Region {
                window: key,
                rect: ghost_rect,
                kind: RegionKind::GhostButton,
            });
        }
    }
    manager.set_regions(regions);
}

fn dim_if(style: Style, ghosted: bool) -> Style {
    if ghosted {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn control_spans(
    control: &Control,
    capturing: bool,
    editing: Option<&str>,
    ghosted: bool,
    theme: &Theme,
) -> Vec<Span<'static>> {
    let text_style = dim_if(Style::default().fg(theme.text_primary), ghosted);
    let label_style = dim_if(Style::default().fg(theme.text_secondary), ghosted);
    let accent_style = dim_if(Style::default().fg(theme.accent_primary), ghosted);

    match control {
        Control::Label { text, .. } => vec![Span::styled(text.clone(), label_style)],
        Control::Checkbox { value, .. } => {
            let mark = if *value { "[x]" } else { "[ ]" };
            vec![Span::styled(mark.to_string(), text_style)]
        }
        Control::Color { value, .. } => {
            let shown = editing.map(|buffer| format!("{buffer}▏"));
            let mut spans = Vec::new();
            if let Some(color) = parse_hex_color(value) {
                spans.push(Span::styled("■ ".to_string(), Style::default().fg(color)));
            }
            spans.push(Span::styled(
                shown.unwrap_or_else(|| value.clone()),
                text_style,
            ));
            spans
        }
        Control::Hotkey { value, .. } => {
            if capturing {
                vec![Span::styled("press a key…".to_string(), accent_style)]
            } else {
                let shown = if value.is_empty() { "unbound" } else { value };
                vec![Span::styled(format!("⌘ {shown}"), text_style)]
            }
        }
        Control::Dropdown { value, .. } => {
            vec![Span::styled(format!("‹ {value} ›"), text_style)]
        }
        Control::Number { value, .. } => {
            vec![Span::styled(format!("− {value} +"), text_style)]
        }
        Control::Text { value, .. } => {
            let shown = editing
                .map(|buffer| format!("{buffer}▏"))
                .unwrap_or_else(|| value.clone());
            vec![Span::styled(shown, text_style)]
        }
        Control::Button { text, .. } => {
            vec![Span::styled(format!("[ {text} ]"), accent_style)]
        }
        Control::Raw { markup } => vec![Span::styled(markup.clone(), text_style)],
        Control::Newline => Vec::new(),
    }
}
