use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use crate::model::{
    aggregate_percent, derive_rows, sort_rows, AppState, Column, Focus, SkillRow, COLUMNS,
};
use crate::theme::{
    error_style, header_style, muted_style, skill_icon, title_style, value_style, TEXT,
};

const SEARCH_HEIGHT: u16 = 3;
const SUMMARY_HEIGHT: u16 = 3;

/// Terminal row the table header lands on: search block, summary block,
/// then the table's own top border. The layout uses fixed heights above
/// the table precisely so header clicks map to a constant row.
pub const HEADER_ROW: u16 = SEARCH_HEIGHT + SUMMARY_HEIGHT + 1;

const COLUMN_WIDTHS: [u16; 5] = [18, 7, 12, 12, 14];
const COLUMN_SPACING: u16 = 1;

pub fn draw(f: &mut Frame, s: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Length(SUMMARY_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_search(f, chunks[0], s);
    draw_summary(f, chunks[1], s);
    draw_results(f, chunks[2], s);
    draw_hints(f, chunks[3], s);
}

/// Map a click on the header row to its column. `x`/`y` are terminal
/// coordinates, `terminal_width` the current width of the frame; anything
/// outside the header cells returns None.
pub fn header_click_column(x: u16, y: u16, terminal_width: u16) -> Option<Column> {
    if y != HEADER_ROW {
        return None;
    }
    column_at(x, terminal_width)
}

fn column_at(x: u16, terminal_width: u16) -> Option<Column> {
    // Inner table area starts past the left border and ends before the
    // right one. A narrow terminal clips trailing columns; a clipped
    // column no longer sits at its nominal x range, so it is not
    // clickable at all.
    let inner_end = terminal_width.saturating_sub(1);
    let mut start = 1u16;
    for (column, width) in COLUMNS.iter().zip(COLUMN_WIDTHS) {
        if start + width > inner_end {
            return None;
        }
        if x >= start && x < start + width {
            return Some(*column);
        }
        start += width + COLUMN_SPACING;
    }
    None
}

fn draw_search(f: &mut Frame, area: Rect, s: &AppState) {
    let editing = s.focus == Focus::Search && !s.fetching;
    let mut spans = Vec::new();
    if !s.username.is_empty() {
        spans.push(Span::styled(s.username.clone(), value_style()));
    } else if !editing {
        spans.push(Span::styled("Enter a username", muted_style()));
    }
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(TEXT)));
    }

    let title = Line::from(vec![Span::styled(
        "OSRS progress to max level",
        title_style(),
    )]);
    let border_style = if s.fetching {
        muted_style()
    } else if s.focus == Focus::Search {
        title_style()
    } else {
        Style::default().fg(TEXT)
    };

    let block = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(block, area);
}

fn draw_summary(f: &mut Frame, area: Rect, s: &AppState) {
    let line = if s.fetching {
        Line::from(Span::styled("Loading", Style::default().fg(TEXT)))
    } else if let Some(err) = &s.error {
        Line::from(Span::styled(err.clone(), error_style()))
    } else if let Some(stats) = &s.stats {
        let rows = derive_rows(stats);
        let aggregate = aggregate_percent(&rows);
        Line::from(vec![
            Span::styled("Overall percent to max: ", header_style()),
            Span::styled(format!("{aggregate:.1}%"), value_style()),
        ])
    } else {
        Line::from(Span::styled(
            "Search for a player to see their progress.",
            Style::default().fg(TEXT),
        ))
    };

    let block = Paragraph::new(line)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(block, area);
}

fn draw_results(f: &mut Frame, area: Rect, s: &AppState) {
    let Some(stats) = &s.stats else {
        let message = if s.fetching { "Loading" } else { "No results" };
        let block = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Skills"));
        f.render_widget(block, area);
        if s.fetching {
            render_loading_overlay(f, area, "Loading…");
        }
        return;
    };

    // Derived fresh on every draw; the payload itself is never mutated.
    let mut rows = derive_rows(stats);
    sort_rows(&mut rows, s.sort);

    if rows.is_empty() {
        let block = Paragraph::new("No trainable skills in the response.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Skills"));
        f.render_widget(block, area);
        return;
    }

    let header_cells = COLUMNS.iter().map(|column| {
        let mut spans = vec![Span::styled(column.title(), header_style())];
        if let Some(indicator) = s.sort.indicator(*column) {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(indicator, title_style()));
        }
        Cell::from(Line::from(spans))
    });
    let header = Row::new(header_cells).height(1);

    let body = rows.iter().map(render_row);

    let widths = COLUMN_WIDTHS.map(Constraint::Length);
    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(Block::default().borders(Borders::ALL).title("Skills"));
    f.render_widget(table, area);
}

fn render_row(row: &SkillRow) -> Row<'static> {
    let cells = COLUMNS.iter().map(|column| match column {
        Column::Name => {
            let (glyph, color) = skill_icon(&row.name);
            Cell::from(Line::from(vec![
                Span::styled(glyph, Style::default().fg(color)),
                Span::raw(" "),
                Span::styled(row.name.clone(), value_style()),
            ]))
        }
        Column::Rank if row.rank == -1 => Cell::from(Span::styled("unranked", muted_style())),
        column => Cell::from(Span::styled(column.display_text(row), value_style())),
    });
    Row::new(cells).height(1)
}

fn draw_hints(f: &mut Frame, area: Rect, s: &AppState) {
    let text = match s.focus {
        Focus::Search => "Enter search · Tab results · Esc quit",
        Focus::Table => "1-5/click header sorts · / edit search · q quit",
    };
    let hint = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(hint, area);
}

fn render_loading_overlay(f: &mut Frame, area: Rect, message: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let text_width = message.chars().count() as u16 + 4;
    let overlay_width = text_width.min(area.width);
    let overlay_height = 3.min(area.height).max(1);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay = Rect {
        x,
        y,
        width: overlay_width,
        height: overlay_height,
    };
    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_click_maps_x_to_column() {
        // First cell spans x = 1..19, then one column of spacing.
        assert_eq!(column_at(0, 80), None);
        assert_eq!(column_at(1, 80), Some(Column::Name));
        assert_eq!(column_at(18, 80), Some(Column::Name));
        assert_eq!(column_at(19, 80), None);
        assert_eq!(column_at(20, 80), Some(Column::Level));
        assert_eq!(column_at(28, 80), Some(Column::Xp));
        assert_eq!(column_at(41, 80), Some(Column::Rank));
        assert_eq!(column_at(54, 80), Some(Column::Percent));
        assert_eq!(column_at(67, 80), Some(Column::Percent));
        assert_eq!(column_at(68, 80), None);
    }

    #[test]
    fn clipped_columns_are_not_clickable() {
        // At width 40 only Name and Level fit in full; the XP cell would
        // start at x = 28 but spill past the right border.
        assert_eq!(column_at(1, 40), Some(Column::Name));
        assert_eq!(column_at(20, 40), Some(Column::Level));
        assert_eq!(column_at(28, 40), None);
        assert_eq!(column_at(41, 40), None);
        assert_eq!(column_at(54, 40), None);
        // Nothing maps at all on a sliver of a terminal.
        assert_eq!(column_at(1, 10), None);
    }

    #[test]
    fn clicks_outside_the_header_row_are_ignored() {
        assert_eq!(header_click_column(2, HEADER_ROW, 80), Some(Column::Name));
        assert_eq!(header_click_column(2, HEADER_ROW + 1, 80), None);
        assert_eq!(header_click_column(2, 0, 80), None);
    }
}
