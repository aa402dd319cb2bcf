//! Terminal UI rendering with ratatui

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{ACTIVE_CELL, Game, GameState};
use crate::piece::Piece;
use crate::settings::Settings;
use crate::tetromino::PieceType;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Total width needed: hold(12) + board(22) + next/stats(16) = 50
const GAME_WIDTH: u16 = 50;
/// Total height needed: board(20) + 2 for borders = 22
const GAME_HEIGHT: u16 = 22;

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Hold box
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(16), // Next + stats
        ])
        .split(game_area);

    render_hold(frame, main_layout[0], game, settings);
    render_board(frame, main_layout[1], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next piece
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[2]);

    render_next(frame, right_layout[0], game, settings);
    render_stats(frame, right_layout[1], game);

    match game.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => render_overlay(frame, area, "GAME OVER", "R restart | Q quit"),
        GameState::Uninitialized | GameState::Running => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the hold piece box
fn render_hold(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let border = if game.can_hold() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(" HOLD ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(piece) = game.held_piece() {
        render_mini_piece(frame, inner, piece, settings);
    }
}

/// Render the next piece box
fn render_next(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(piece) = game.next_piece() {
        render_mini_piece(frame, inner, piece, settings);
    }
}

/// Render a small piece preview (hold and next boxes)
fn render_mini_piece(frame: &mut Frame, area: Rect, piece: &Piece, settings: &Settings) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let (block_char, _) = settings.visual.block_chars();
    let color = piece.kind.color();

    let lines: Vec<Line> = piece
        .shape
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&cell| {
                    if cell != 0 {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the board from the engine's display grid
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, highlight_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = game.display_grid();
    let locked = game.locked_cells();
    let active_color = game
        .current()
        .map(|piece| piece.kind.color())
        .unwrap_or(Color::White);

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);
    for (y, row) in grid.iter().enumerate() {
        let mut spans = Vec::with_capacity(BOARD_WIDTH);
        for (x, &cell) in row.iter().enumerate() {
            let (text, style) = if locked.contains(&(x as i32, y as i32)) {
                // Fresh lock flash, cleared by the engine after its window
                (highlight_char, Style::default().fg(Color::White).bold())
            } else if cell == ACTIVE_CELL {
                (block_char, Style::default().fg(active_color))
            } else if cell > 0 {
                let color = PieceType::from_id(cell as u8 - 1)
                    .map(|t| t.color())
                    .unwrap_or(Color::White);
                (block_char, Style::default().fg(color))
            } else {
                (EMPTY, Style::default())
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the score panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "SCORE",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", game.score.points),
        Style::default().fg(Color::Yellow).bold(),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "BEST",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", game.score.high.max(game.score.points)),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "LINES",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", game.score.lines),
        Style::default().fg(Color::Green),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a popup overlay (pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 24, 5);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
