//! Stateless UI rendering for the memory game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use strictly_memory::{CardView, RoundPhase, Snapshot, Symbol};
use unicode_width::UnicodeWidthStr;

/// Display width of one card, borders included.
const CELL_WIDTH: usize = 6;

/// Face-down card back.
const CARD_BACK: &str = "░░";

/// Everything the renderer reads.
#[derive(Debug, Clone)]
pub struct View<'a> {
    /// The round to draw.
    pub snapshot: &'a Snapshot,
    /// Position under the cursor.
    pub cursor: usize,
    /// Message for the status bar.
    pub status: &'a str,
    /// Grid size label, e.g. "4x4".
    pub size_label: String,
    /// Whether to draw the welcome splash on top.
    pub splash: bool,
}

/// Renders the full screen.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(4),    // Grid
            Constraint::Length(3), // Counters
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Strictly Memory")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_grid(frame, chunks[1], view);
    draw_counters(frame, chunks[2], view);

    let help = Paragraph::new("arrows/hjkl move · enter select · n new · +/- size · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);

    if view.splash {
        draw_splash(frame, area);
    }
}

fn draw_grid(frame: &mut Frame, area: Rect, view: &View<'_>) {
    let columns = (*view.snapshot.columns()).max(1);
    let lines: Vec<Line> = view
        .snapshot
        .cards()
        .chunks(columns)
        .enumerate()
        .map(|(row, cards)| {
            let spans: Vec<Span> = cards
                .iter()
                .enumerate()
                .map(|(col, card)| card_span(*card, row * columns + col == view.cursor))
                .collect();
            Line::from(spans)
        })
        .collect();

    let width = u16::try_from(columns * CELL_WIDTH + 2).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let grid = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.size_label)),
        );
    frame.render_widget(grid, center_rect(area, width, height));
}

/// One card as a styled, fixed-width span.
pub fn card_span(card: CardView, focused: bool) -> Span<'static> {
    let face = card.symbol().map_or(CARD_BACK, Symbol::glyph);
    let style = match card {
        CardView::Hidden => Style::default().fg(Color::DarkGray),
        CardView::Revealed(_) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        CardView::Matched(_) => Style::default().fg(Color::Green),
    };
    let style = if focused {
        style.bg(Color::White).fg(Color::Black)
    } else {
        style
    };
    let text = if focused {
        format!("[{}]", pad(face, CELL_WIDTH - 2))
    } else {
        format!(" {} ", pad(face, CELL_WIDTH - 2))
    };
    Span::styled(text, style)
}

/// Centers `text` in `width` terminal columns.
pub fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn draw_counters(frame: &mut Frame, area: Rect, view: &View<'_>) {
    let snapshot = view.snapshot;
    let phase_style = match snapshot.phase() {
        RoundPhase::Complete => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Yellow),
    };
    let line = Line::from(vec![
        Span::raw(format!("Moves: {}   ", snapshot.move_count())),
        Span::raw(format!("Matches: {}   ", snapshot.matched_count())),
        Span::raw(format!("Time: {}   ", snapshot.elapsed_display())),
        Span::styled(view.status.to_string(), phase_style),
    ]);
    let counters = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(counters, area);
}

fn draw_splash(frame: &mut Frame, area: Rect) {
    let popup = center_rect(area, 44, 9);
    let text = vec![
        Line::from(Span::styled(
            "Welcome to Strictly Memory",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Turn two cards at a time and find every pair."),
        Line::from("The clock starts with your first card."),
        Line::from(""),
        Line::from("Press any key to start."),
    ];
    let splash = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, popup);
    frame.render_widget(splash, popup);
}

/// Plain-text grid of a face-up deck.
pub fn deck_text(cards: &[Symbol], columns: usize) -> String {
    cards
        .chunks(columns.max(1))
        .map(|row| {
            row.iter()
                .map(|symbol| pad(symbol.glyph(), CELL_WIDTH - 2))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Instant;
    use strictly_memory::{GridConfig, MatchGame};

    #[test]
    fn test_pad_centers_wide_glyphs() {
        assert_eq!(pad("ab", 4), " ab ");
        assert_eq!(pad("🧱", 4), " 🧱 ");
        assert_eq!(pad("toolong", 4), "toolong");
    }

    #[test]
    fn test_card_span_hides_face_down() {
        let span = card_span(CardView::Hidden, false);
        assert!(span.content.contains(CARD_BACK));
        let symbol = Symbol::from_slot(0).unwrap();
        let span = card_span(CardView::Matched(symbol), true);
        assert!(span.content.starts_with('['));
        assert!(span.content.contains(symbol.glyph()));
    }

    #[test]
    fn test_deck_text_rows() {
        let cards: Vec<Symbol> = Symbol::first(4).flat_map(|s| [s, s]).collect();
        let text = deck_text(&cards, 4);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_draw_renders_counters() {
        let mut game = MatchGame::seeded(1, GridConfig::with_rows(4)).unwrap();
        let now = Instant::now();
        game.select_at(0, now);
        let snapshot = game.snapshot_at(now);
        let view = View {
            snapshot: &snapshot,
            cursor: 0,
            status: "Pick its partner.",
            size_label: "4x4".to_string(),
            splash: false,
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &view)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Moves: 0"));
        assert!(text.contains("Time: 0s"));
        assert!(text.contains("Strictly Memory"));
    }
}
