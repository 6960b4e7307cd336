//! Incremental terminal renderer: only cells that changed since the last
//! frame are redrawn.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::game::{Game, Outcome};
use crate::grid::{Pos, Tile};
use crate::input::CONTROLS;

/// HUD row above the map.
const HUD_ROWS: u16 = 1;
/// Controls plus two message rows below the map.
const FOOTER_ROWS: u16 = 3;
const MIN_TERM_W: u16 = 20;
const MIN_TERM_H: u16 = HUD_ROWS + FOOTER_ROWS + 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Adversary,
    PlayerTrail,
    AdversaryTrail,
    Exit,
    Wall,
    Floor,
    Hidden,
}

impl Glyph {
    fn text(self) -> char {
        match self {
            Glyph::Player => '†',
            Glyph::Adversary => 'X',
            Glyph::PlayerTrail | Glyph::AdversaryTrail => '·',
            Glyph::Exit => '0',
            Glyph::Wall => '#',
            Glyph::Floor => '.',
            Glyph::Hidden => ' ',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
    pub bold: bool,
}

impl Cell {
    const fn plain(glyph: Glyph, color: Color) -> Self {
        Self {
            glyph,
            color,
            bold: false,
        }
    }
}

/// What to draw at `pos`. Only the player is visible through the fog
/// unless `reveal_all` is set.
pub fn cell_for(game: &Game, pos: Pos, reveal_all: bool) -> Cell {
    if pos == game.player.pos {
        return Cell::plain(Glyph::Player, Color::Green);
    }
    if !reveal_all && !game.is_seen(pos) {
        return Cell::plain(Glyph::Hidden, Color::Reset);
    }
    if pos == game.adversary.pos {
        return Cell {
            glyph: Glyph::Adversary,
            color: Color::Red,
            bold: true,
        };
    }
    let grid = game.grid();
    if grid.is_floor(pos) && game.player.trail.contains(pos) {
        return Cell::plain(Glyph::PlayerTrail, Color::Green);
    }
    if grid.is_floor(pos) && game.adversary.trail.contains(pos) {
        return Cell::plain(Glyph::AdversaryTrail, Color::Red);
    }
    match grid.get(pos) {
        Some(Tile::Exit) => Cell {
            glyph: Glyph::Exit,
            color: Color::Red,
            bold: true,
        },
        Some(Tile::Floor) => Cell::plain(Glyph::Floor, Color::Reset),
        Some(Tile::Wall) => Cell::plain(Glyph::Wall, Color::Grey),
        None => Cell::plain(Glyph::Hidden, Color::Reset),
    }
}

/// Window of map tiles shown on screen, centred on the player and clamped
/// so it never extends past the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn around(
        focus: Pos,
        map_w: usize,
        map_h: usize,
        avail_w: usize,
        avail_h: usize,
    ) -> Self {
        let width = avail_w.min(map_w).max(1);
        let height = avail_h.min(map_h).max(1);
        let left = focus.x.saturating_sub(width / 2).min(map_w.saturating_sub(width));
        let top = focus.y.saturating_sub(height / 2).min(map_h.saturating_sub(height));
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Cuts `text` to `width` terminal columns and pads it with spaces to fill
/// exactly that many.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    let pad = width.saturating_sub(UnicodeWidthStr::width(out.as_str()));
    out.extend(std::iter::repeat(' ').take(pad));
    out
}

pub fn hud_line(game: &Game) -> String {
    format!(
        "Tick: {}   Pos: {}   Adversary: {}{}",
        game.tick_count(),
        game.player.pos,
        game.adversary.mode.label(),
        if game.adversary.locked_on { " (locked on)" } else { "" }
    )
}

pub struct Renderer {
    last: Vec<Cell>,
    last_text: Vec<String>,
    view: Viewport,
    needs_full: bool,
    reveal_all: bool,
}

impl Renderer {
    pub fn new(reveal_all: bool) -> Self {
        Self {
            last: Vec::new(),
            last_text: Vec::new(),
            view: Viewport::default(),
            needs_full: true,
            reveal_all,
        }
    }

    pub fn render(&mut self, out: &mut impl Write, game: &Game) -> io::Result<()> {
        let (term_w, term_h) = terminal::size()?;
        out.queue(MoveTo(0, 0))?;
        if term_w < MIN_TERM_W || term_h < MIN_TERM_H {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                MIN_TERM_W, MIN_TERM_H, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let grid = game.grid();
        let view = Viewport::around(
            game.player.pos,
            grid.width(),
            grid.height(),
            term_w as usize,
            (term_h - HUD_ROWS - FOOTER_ROWS) as usize,
        );
        if self.needs_full || view.width != self.view.width || view.height != self.view.height {
            out.queue(Clear(ClearType::All))?;
            self.last = vec![Cell::plain(Glyph::Hidden, Color::Reset); view.width * view.height];
            self.last_text.clear();
            self.needs_full = true;
        }
        if view != self.view {
            self.needs_full = true;
        }
        self.view = view;

        let text_rows = [
            0,
            HUD_ROWS + view.height as u16,
            HUD_ROWS + view.height as u16 + 1,
            HUD_ROWS + view.height as u16 + 2,
        ];
        let mut text = vec![hud_line(game), CONTROLS.to_string()];
        text.extend(game.recent_messages(2).iter().cloned());
        text.resize(text_rows.len(), String::new());
        for (i, line) in text.iter().enumerate() {
            if self.needs_full || self.last_text.get(i) != Some(line) {
                out.queue(MoveTo(0, text_rows[i]))?;
                out.queue(SetForegroundColor(Color::White))?;
                out.queue(Print(fit(line, term_w as usize)))?;
                out.queue(ResetColor)?;
            }
        }
        self.last_text = text;

        for vy in 0..view.height {
            for vx in 0..view.width {
                let pos = Pos::new(view.left + vx, view.top + vy);
                let cell = cell_for(game, pos, self.reveal_all);
                let idx = vy * view.width + vx;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    draw_cell(out, vx as u16, HUD_ROWS + vy as u16, cell)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()
    }

    /// Draws the last frame with the whole map revealed and a closing line.
    pub fn render_final(&mut self, out: &mut impl Write, game: &Game) -> io::Result<()> {
        self.reveal_all = true;
        self.needs_full = true;
        self.render(out, game)?;
        let verdict = match game.outcome() {
            Outcome::Won => "You escaped. (press any key)",
            Outcome::Caught => "You were caught. (press any key)",
            Outcome::Quit => "Goodbye!",
            Outcome::Running => return Ok(()),
        };
        let row = HUD_ROWS + self.view.height as u16;
        out.queue(MoveTo(0, row))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(Print(verdict))?;
        out.flush()
    }
}

fn draw_cell(out: &mut impl Write, x: u16, y: u16, cell: Cell) -> io::Result<()> {
    out.queue(MoveTo(x, y))?;
    if cell.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    out.queue(SetForegroundColor(cell.color))?;
    out.queue(Print(cell.glyph.text()))?;
    if cell.bold {
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    out.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adversary::Adversary;
    use crate::grid::Grid;

    fn game() -> Game {
        let grid = Grid::from_ascii(&[
            "##############",
            "#...........>#",
            "##############",
        ]);
        let adversary = Adversary::new(Pos::new(10, 1), 2);
        Game::with_adversary(grid, Pos::new(2, 1), Pos::new(12, 1), adversary, 2)
    }

    #[test]
    fn glyph_priority() {
        let mut game = game();
        game.adversary.trail.insert(Pos::new(3, 1));
        game.adversary.trail.insert(Pos::new(4, 1));
        game.player.trail.insert(Pos::new(3, 1));

        assert_eq!(cell_for(&game, Pos::new(2, 1), false).glyph, Glyph::Player);
        assert_eq!(cell_for(&game, Pos::new(3, 1), false).glyph, Glyph::PlayerTrail);
        assert_eq!(cell_for(&game, Pos::new(4, 1), false).glyph, Glyph::AdversaryTrail);
        assert_eq!(cell_for(&game, Pos::new(0, 0), false).glyph, Glyph::Wall);
    }

    #[test]
    fn fog_hides_unseen_tiles() {
        let game = game();
        assert_eq!(cell_for(&game, Pos::new(10, 1), false).glyph, Glyph::Hidden);
        assert_eq!(cell_for(&game, Pos::new(12, 1), false).glyph, Glyph::Hidden);
        let adversary = cell_for(&game, Pos::new(10, 1), true);
        assert_eq!(adversary.glyph, Glyph::Adversary);
        assert!(adversary.bold);
        assert_eq!(cell_for(&game, Pos::new(12, 1), true).glyph, Glyph::Exit);
        assert_eq!(cell_for(&game, Pos::new(7, 1), true).glyph, Glyph::Floor);
    }

    #[test]
    fn viewport_centres_and_clamps() {
        let mid = Viewport::around(Pos::new(50, 20), 100, 40, 40, 10);
        assert_eq!((mid.left, mid.top, mid.width, mid.height), (30, 15, 40, 10));
        let corner = Viewport::around(Pos::new(1, 1), 100, 40, 40, 10);
        assert_eq!((corner.left, corner.top), (0, 0));
        let far = Viewport::around(Pos::new(99, 39), 100, 40, 40, 10);
        assert_eq!((far.left, far.top), (60, 30));
        let small_map = Viewport::around(Pos::new(3, 3), 10, 10, 40, 20);
        assert_eq!((small_map.left, small_map.width, small_map.height), (0, 10, 10));
    }

    #[test]
    fn fit_truncates_and_pads() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("†·x", 2), "†·");
        assert_eq!(fit("", 0), "");
    }
}
