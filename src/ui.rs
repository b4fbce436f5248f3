use image::GenericImageView;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::logos::Logo;
use crate::registry::GameView;
use crate::scheduler::UiUpdate;

const ROW_HEIGHT: u16 = 5;
const LOGO_WIDTH: u16 = 10;
const LOGO_SIZE: u32 = 40;

/// Everything the UI loop shows. Mutated only by that loop.
#[derive(Debug, Default)]
pub struct ViewModel {
    pub clock: String,
    pub games: Vec<GameView>,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl ViewModel {
    pub fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Clock(text) => self.clock = text,
            UiUpdate::Games { games, notice } => {
                self.games = games;
                self.notice = notice;
            }
            UiUpdate::FetchFailed(reason) => {
                self.notice = Some(format!("Last update failed: {}", reason));
            }
        }
    }
}

pub fn draw(f: &mut Frame, view: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4), // Clock
                Constraint::Length(1), // Notice
                Constraint::Min(0),    // Games
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_clock(f, &view.clock, chunks[0]);

    if let Some(notice) = &view.notice {
        let p = Paragraph::new(notice.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(p, chunks[1]);
    }

    let block = Block::default().borders(Borders::TOP);
    let games_area = block.inner(chunks[2]);
    f.render_widget(block, chunks[2]);

    draw_games(f, &view.games, games_area);
}

/// Full rows with logos when everything fits, one-line text rows otherwise.
/// Whatever still does not fit is summarized on the last line.
fn draw_games(f: &mut Frame, games: &[GameView], area: Rect) {
    let height = area.height as usize;
    let compact = games.len() * ROW_HEIGHT as usize > height;
    let row_height = if compact { 1 } else { ROW_HEIGHT };

    let capacity = height / row_height as usize;
    let shown = if games.len() > capacity {
        capacity.saturating_sub(1)
    } else {
        games.len()
    };

    let mut y = area.top();
    for game in &games[..shown] {
        let row = Rect::new(area.left(), y, area.width, row_height);
        draw_game_row(f, game, row, compact);
        y += row_height;
    }

    let hidden = games.len() - shown;
    if hidden > 0 && y < area.bottom() {
        let more = Paragraph::new(format!("+{} more", hidden))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(more, Rect::new(area.left(), y, area.width, 1));
    }
}

fn draw_clock(f: &mut Frame, text: &str, area: Rect) {
    // Quadrant glyphs are 4 cells wide.
    if (text.chars().count() as u16).saturating_mul(4) > area.width {
        let p = Paragraph::new(vec![Line::from(""), Line::from(text)])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(p, area);
    } else {
        let big = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .lines(vec![text.to_string().into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(big, area);
    }
}

fn draw_game_row(f: &mut Frame, game: &GameView, area: Rect, compact: bool) {
    let logo_width = if compact { 0 } else { LOGO_WIDTH };
    let pad = if compact { 0 } else { (ROW_HEIGHT / 2) as usize };
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length(logo_width),
                Constraint::Percentage(25),
                Constraint::Length(4),
                Constraint::Length(logo_width),
                Constraint::Percentage(25),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let slots = &game.slots;
    let text_style = Style::default().fg(Color::White);

    if !compact {
        draw_logo(f, slots.team1_logo.as_ref(), cells[0]);
        draw_logo(f, slots.team2_logo.as_ref(), cells[3]);
    }
    f.render_widget(middle_line(&slots.team1_info, pad, text_style), cells[1]);
    f.render_widget(
        middle_line(slots.separator, pad, Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        cells[2],
    );
    f.render_widget(middle_line(&slots.team2_info, pad, text_style), cells[4]);
    f.render_widget(
        middle_line(&slots.status, pad, Style::default().fg(Color::Blue)),
        cells[5],
    );
}

fn middle_line(text: &str, pad: usize, style: Style) -> Paragraph<'_> {
    let mut lines = vec![Line::from(""); pad];
    lines.push(Line::from(text));
    Paragraph::new(lines).style(style)
}

/// Paints the logo as braille dots; an absent logo leaves the cell blank.
fn draw_logo(f: &mut Frame, logo: Option<&Logo>, area: Rect) {
    let Some(img) = logo else {
        return;
    };
    let size = LOGO_SIZE as f64;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, size])
        .y_bounds([0.0, size])
        .paint(|ctx| {
            let (w, h) = img.dimensions();
            for y in 0..LOGO_SIZE {
                for x in 0..LOGO_SIZE {
                    let img_x = x * w / LOGO_SIZE;
                    let img_y = y * h / LOGO_SIZE;
                    if img_x < w && img_y < h {
                        let p = img.get_pixel(img_x, img_y);
                        if p[3] > 128 {
                            ctx.draw(&Points {
                                coords: &[(x as f64, size - 1.0 - y as f64)],
                                color: Color::Rgb(p[0], p[1], p[2]),
                            });
                        }
                    }
                }
            }
        });
    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{GameViewState, SEPARATOR};
    use image::{DynamicImage, Rgba, RgbaImage};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn row(id: &str, team1: &str, team2: &str, status: &str, logo: Option<Logo>) -> GameView {
        GameView {
            id: id.into(),
            slots: GameViewState {
                team1_logo: logo.clone(),
                team1_info: team1.into(),
                separator: SEPARATOR,
                team2_logo: None,
                team2_info: team2.into(),
                status: status.into(),
            },
        }
    }

    fn rendered(view: &ViewModel) -> String {
        rendered_on(view, 120, 20)
    }

    fn rendered_on(view: &ViewModel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_rows_and_notice() {
        let logo: Logo = Arc::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([0, 0, 255, 255]),
        )));
        let view = ViewModel {
            clock: "Il est 06:05:09 PM EST on Jan 13, 2024".into(),
            games: vec![
                row("401", "Bruins 3", "Canadiens 2", "Period: 3, Time: 05:12", Some(logo)),
                row("402", "Jets", "Wild", "Starts at 8:00 PM EST", None),
            ],
            notice: Some("Last update failed: timeout".into()),
            should_quit: false,
        };

        let screen = rendered(&view);
        assert!(screen.contains("Bruins 3"));
        assert!(screen.contains("Canadiens 2"));
        assert!(screen.contains("Period: 3, Time: 05:12"));
        assert!(screen.contains("Starts at 8:00 PM EST"));
        assert!(screen.contains("Last update failed: timeout"));
        assert!(screen.contains("Il est 06:05:09 PM EST"));
    }

    fn night_of(count: usize) -> ViewModel {
        ViewModel {
            games: (0..count)
                .map(|i| {
                    row(
                        &i.to_string(),
                        &format!("Home {} 1", i),
                        &format!("Away {} 0", i),
                        "Period: 1, Time: 10:00",
                        None,
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn crowded_night_switches_to_compact_rows() {
        let screen = rendered_on(&night_of(8), 80, 24);
        for i in 0..8 {
            assert!(screen.contains(&format!("Home {} 1", i)), "game {} missing", i);
            assert!(screen.contains(&format!("Away {} 0", i)), "game {} missing", i);
        }
        assert!(!screen.contains("more"));
    }

    #[test]
    fn overflow_is_counted_not_dropped() {
        // 18 free lines: 17 games plus the summary line.
        let screen = rendered_on(&night_of(30), 80, 24);
        assert!(screen.contains("Home 16 1"));
        assert!(!screen.contains("Home 17 1"));
        assert!(screen.contains("+13 more"));
    }

    #[test]
    fn fetch_failure_keeps_rows() {
        let mut view = ViewModel::default();
        view.apply(UiUpdate::Games {
            games: vec![row("1", "Jets 1", "Wild 0", "Period: 1, Time: 10:00", None)],
            notice: None,
        });
        view.apply(UiUpdate::FetchFailed("boom".into()));
        assert_eq!(view.games.len(), 1);
        assert_eq!(view.notice.as_deref(), Some("Last update failed: boom"));

        view.apply(UiUpdate::Games {
            games: vec![],
            notice: Some(crate::model::Scoreboard::NO_GAMES_TEXT.into()),
        });
        assert!(view.games.is_empty());
    }

    #[test]
    fn clock_update_replaces_text() {
        let mut view = ViewModel::default();
        view.apply(UiUpdate::Clock("Il est 01:00:00 AM EST on Jan 01, 2024".into()));
        assert_eq!(view.clock, "Il est 01:00:00 AM EST on Jan 01, 2024");
    }
}
