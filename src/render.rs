use crate::config::Settings;
use crate::games::{CatchGame, LaserGame};
use crate::input::SceneKind;
use crate::model::{Character, Mood, PetState};
use crossterm::{
    cursor, execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::time::Instant;

/// Top-left cell of a mini-game play area, inside its border.
pub(crate) const GAME_ORIGIN: (u16, u16) = (1, 3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
            c.bold = false;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let prev = CellBuffer::new(cols, rows);
        let cur = CellBuffer::new(cols, rows);

        Ok(Self {
            out,
            cols,
            rows,
            prev,
            cur,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                if last_bold != Some(c.bold) {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = Some(c.bold);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text helpers
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

fn bar(value01: f64, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f64 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn character_color(character: Character, color_on: bool) -> Color {
    if !color_on {
        return Color::White;
    }
    match character {
        Character::Merc => Color::Rgb { r: 230, g: 60, b: 60 },
        Character::Wolf => Color::Rgb { r: 235, g: 200, b: 60 },
    }
}

fn need_color(value: f64, color_on: bool) -> Color {
    if !color_on {
        return Color::White;
    }
    if value <= 20.0 {
        Color::Red
    } else if value <= 50.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/* -----------------------------
   Main scene
------------------------------ */

pub(crate) fn draw_status_panel(
    buf: &mut CellBuffer,
    st: &PetState,
    stage_progress: f64,
    settings: &Settings,
) {
    let bg = Color::Black;
    let fg = Color::White;
    let color_on = settings.enable_color;

    let title = format!(
        "Herogotchi  |  {} the {}  |  lvl {}  |  {}",
        st.character.name(),
        st.stage_name(),
        st.level,
        st.mood.label()
    );
    draw_text(buf, 1, 0, &title, character_color(st.character, color_on), bg);

    let needs = [
        ("Hunger", st.hunger),
        ("Happy ", st.happiness),
        ("Energy", st.energy),
        ("Health", st.health),
        ("Lonely", st.loneliness),
    ];
    for (i, (name, val)) in needs.iter().enumerate() {
        let b = bar(*val / 100.0, 14);
        let s = format!("{name}: {b} {:>5.1}", val);
        // loneliness reads inverted: low is good
        let c = if *name == "Lonely" {
            need_color(100.0 - *val, color_on)
        } else {
            need_color(*val, color_on)
        };
        draw_text(buf, 1, 2 + i as u16, &s, c, bg);
    }

    let xp = format!(
        "XP    : {} {:>3.0}/{:.0}",
        bar(st.xp / st.xp_to_next, 14),
        st.xp,
        st.xp_to_next
    );
    draw_text(buf, 1, 8, &xp, fg, bg);

    let stage = format!(
        "Stage : {} {:>4.0}%  age {:.1}m",
        bar(stage_progress / 100.0, 14),
        stage_progress,
        st.age
    );
    draw_text(buf, 1, 9, &stage, fg, bg);

    let extras = format!(
        "Pets: {}   Laser best: {}",
        st.total_clicks, st.laser_high_score
    );
    draw_text(buf, 1, 11, &extras, fg, bg);

    draw_text(buf, 1, 13, "Trophies:", fg, bg);
    if st.achievements.is_empty() {
        draw_text(buf, 3, 14, "(none yet)", Color::DarkGrey, bg);
    }
    for (i, a) in st.achievements.iter().enumerate() {
        let y = 14 + i as u16;
        if y >= buf.h.saturating_sub(2) {
            break;
        }
        draw_text(buf, 3, y, &format!("★ {}", a.label()), fg, bg);
    }
}

/// Sprite rows for the pet body. Size tracks the stage loosely; the face
/// tracks the mood.
fn pet_sprite(st: &PetState) -> Vec<String> {
    let eyes = match st.mood {
        Mood::Sleeping => ('-', '-'),
        Mood::Sick => ('x', 'x'),
        Mood::Sad => ('.', '.'),
        _ => ('o', 'o'),
    };
    let mouth = match st.mood {
        Mood::Happy => "\\___/",
        Mood::Sad | Mood::Sick => "/---\\",
        Mood::Hungry => " ooo ",
        Mood::Sleeping => " zzz ",
        Mood::Normal => " ___ ",
    };

    let (head_l, head_r) = match st.character {
        Character::Merc => ("(=", "=)"),
        Character::Wolf => ("<|", "|>"),
    };

    let mut rows = vec![
        format!("   {}^---^{}   ", head_l, head_r),
        "  /         \\  ".to_string(),
        format!(" |  {}   {}  | ", eyes.0, eyes.1),
        format!(" |   {}   | ", mouth),
        "  \\         /  ".to_string(),
        "   \\_______/   ".to_string(),
    ];

    // grown stages get a torso
    if st.evolution_stage >= 2 {
        rows.push("    |     |    ".to_string());
        rows.push("   _|     |_   ".to_string());
    }
    if st.evolution_stage >= 5 {
        rows.push("  /  \\___/  \\  ".to_string());
    }
    rows
}

pub(crate) fn draw_pet(
    buf: &mut CellBuffer,
    st: &PetState,
    cx: i32,
    cy: i32,
    phase: f64,
    color_on: bool,
) {
    let bg = Color::Black;
    let fg = character_color(st.character, color_on);

    let bounce = if st.is_alive && st.mood != Mood::Sleeping {
        (phase.sin() * 1.2).round() as i32
    } else {
        0
    };

    let rows = pet_sprite(st);
    let h = rows.len() as i32;
    let y0 = cy - h / 2 + bounce;

    for (yy, line) in rows.iter().enumerate() {
        let y = y0 + yy as i32;
        if y < 0 || y >= buf.h as i32 {
            continue;
        }
        let mut x = cx - (line.chars().count() as i32) / 2;
        for ch in line.chars() {
            if ch != ' ' && x >= 0 && x < buf.w as i32 {
                buf.set(
                    x as u16,
                    y as u16,
                    Cell {
                        ch,
                        fg,
                        bg,
                        bold: false,
                    },
                );
            }
            x += 1;
        }
    }
}

pub(crate) fn draw_speech_bubble(buf: &mut CellBuffer, text: &str, cx: i32, y: i32) {
    let bg = Color::Black;
    let fg = Color::White;
    let width = text.chars().count() as i32 + 2;
    let x0 = (cx - width / 2).max(0);
    if y < 1 {
        return;
    }
    let top: String = std::iter::repeat('─').take(width as usize).collect();
    draw_text(buf, x0 as u16, (y - 1) as u16, &format!("╭{top}╮"), fg, bg);
    draw_text(buf, x0 as u16, y as u16, &format!("│ {text} │"), fg, bg);
    draw_text(buf, x0 as u16, (y + 1) as u16, &format!("╰{top}╯"), fg, bg);
    draw_text(buf, (cx.max(0)) as u16, (y + 2) as u16, "▿", fg, bg);
}

pub(crate) fn draw_toasts(buf: &mut CellBuffer, toasts: &[String]) {
    let bg = Color::Black;
    let fg = Color::Cyan;
    let base = buf.h.saturating_sub(2 + toasts.len() as u16);
    for (i, t) in toasts.iter().enumerate() {
        draw_text(buf, 1, base + i as u16, t, fg, bg);
    }
}

pub(crate) fn draw_footer(buf: &mut CellBuffer, scene: SceneKind) {
    let help = match scene {
        SceneKind::CharacterSelect => "←→ choose | enter confirm | q quit",
        SceneKind::Main => {
            "f feed | p play | e heal | s sleep | t train | g treat | space pet | l laser | b burgers | r reset | h help | q quit"
        }
        SceneKind::Help => "esc/h close | q quit",
        SceneKind::Laser => "arrows aim | space zap | esc stop | q quit",
        SceneKind::Catch => "←→ move basket | esc stop | q quit",
        SceneKind::Dead => "n new pet | q quit",
    };
    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        help,
        Color::DarkGrey,
        Color::Black,
    );
}

/* -----------------------------
   Character selection
------------------------------ */

pub(crate) fn draw_character_select(buf: &mut CellBuffer, cursor: usize, color_on: bool) {
    let bg = Color::Black;
    let fg = Color::White;

    let title = "Choose your hero";
    draw_text(buf, (buf.w / 2).saturating_sub(title.len() as u16 / 2), 2, title, fg, bg);

    let cards = [
        (
            Character::Merc,
            "The talkative one. Regenerates, jokes, demands snacks.",
        ),
        (
            Character::Wolf,
            "The gruff one. Claws, instincts, a soft spot for you.",
        ),
    ];

    let card_w = buf.w / 2;
    for (i, (ch, blurb)) in cards.iter().enumerate() {
        let x0 = 2 + i as u16 * card_w;
        let selected = cursor == i;
        let col = if selected {
            character_color(*ch, color_on)
        } else {
            Color::DarkGrey
        };
        let marker = if selected { "> " } else { "  " };
        draw_text(buf, x0, 5, &format!("{marker}{}", ch.name()), col, bg);
        for (j, line) in wrap(blurb, card_w.saturating_sub(6) as usize).iter().enumerate() {
            draw_text(buf, x0 + 2, 7 + j as u16, line, fg, bg);
        }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width.max(8) {
            out.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}

/* -----------------------------
   Mini-game scenes
------------------------------ */

fn draw_game_border(buf: &mut CellBuffer, w: i32, h: i32) {
    let bg = Color::Black;
    let fg = Color::DarkGrey;
    let (ox, oy) = (GAME_ORIGIN.0 as i32 - 1, GAME_ORIGIN.1 as i32 - 1);
    for x in ox..=(ox + w + 1) {
        for &y in &[oy, oy + h + 1] {
            if x >= 0 && y >= 0 {
                let ch = if x == ox || x == ox + w + 1 { '+' } else { '─' };
                buf.set(x as u16, y as u16, Cell { ch, fg, bg, bold: false });
            }
        }
    }
    for y in (oy + 1)..=(oy + h) {
        for &x in &[ox, ox + w + 1] {
            if x >= 0 && y >= 0 {
                buf.set(x as u16, y as u16, Cell { ch: '│', fg, bg, bold: false });
            }
        }
    }
}

pub(crate) fn draw_laser_scene(
    buf: &mut CellBuffer,
    game: &LaserGame,
    area_w: i32,
    area_h: i32,
    now: Instant,
    color_on: bool,
) {
    let bg = Color::Black;
    let hud = format!(
        "LASER CHASE   score {}   time {}s   difficulty {}x",
        game.score,
        game.secs_left(now),
        game.difficulty()
    );
    draw_text(buf, 1, 0, &hud, Color::White, bg);
    draw_text(buf, 1, 1, "Zap the red dot!", Color::DarkGrey, bg);

    draw_game_border(buf, area_w, area_h);
    let (ox, oy) = (GAME_ORIGIN.0 as i32, GAME_ORIGIN.1 as i32);

    if let Some(dot) = game.dot() {
        let fg = if color_on { Color::Red } else { Color::White };
        buf.set(
            (ox + dot.x) as u16,
            (oy + dot.y) as u16,
            Cell { ch: '●', fg, bg, bold: true },
        );
    }

    let (cx, cy) = game.cursor;
    let fg = if color_on { Color::Cyan } else { Color::White };
    buf.set(
        (ox + cx) as u16,
        (oy + cy) as u16,
        Cell { ch: '+', fg, bg, bold: true },
    );
}

pub(crate) fn draw_catch_scene(
    buf: &mut CellBuffer,
    game: &CatchGame,
    area_w: i32,
    area_h: i32,
    now: Instant,
    color_on: bool,
) {
    let bg = Color::Black;
    let hud = format!(
        "BURGER RAIN   score {}   time {}s",
        game.score,
        game.secs_left(now)
    );
    draw_text(buf, 1, 0, &hud, Color::White, bg);
    draw_text(buf, 1, 1, "Catch the falling burgers!", Color::DarkGrey, bg);

    draw_game_border(buf, area_w, area_h);
    let (ox, oy) = (GAME_ORIGIN.0 as i32, GAME_ORIGIN.1 as i32);

    let fg = if color_on { Color::Yellow } else { Color::White };
    for b in game.burgers() {
        let y = b.y.floor() as i32;
        if y >= 0 && y < area_h {
            buf.set(
                (ox + b.x) as u16,
                (oy + y) as u16,
                Cell { ch: 'Θ', fg, bg, bold: false },
            );
        }
    }

    let by = oy + area_h - 1;
    let fg = if color_on { Color::Green } else { Color::White };
    for (dx, ch) in [(-1, '\\'), (0, '_'), (1, '/')] {
        buf.set(
            (ox + game.basket_x + dx) as u16,
            by as u16,
            Cell { ch, fg, bg, bold: false },
        );
    }
}

/* -----------------------------
   Overlays
------------------------------ */

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let bg = Color::Black;
    let fg = Color::White;

    let w = buf.w;
    let h = buf.h;
    let bw = std::cmp::min(58, w.saturating_sub(4));
    let body_lines = body.lines().count() as u16;
    let bh = std::cmp::min(body_lines + 5, h.saturating_sub(2));
    if bw < 8 || bh < 5 {
        return;
    }

    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            let ch = if y == y0 || y == y0 + bh - 1 {
                if x == x0 || x == x0 + bw - 1 {
                    '+'
                } else {
                    '─'
                }
            } else if x == x0 || x == x0 + bw - 1 {
                '│'
            } else {
                ' '
            };
            buf.set(x, y, Cell { ch, fg, bg, bold: false });
        }
    }

    draw_text(buf, x0 + 2, y0 + 1, title, fg, bg);
    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, fg, bg);
        yy += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_buffer_keeps_bold_until_cleared() {
        let mut buf = CellBuffer::new(4, 2);
        buf.set(
            1,
            1,
            Cell {
                ch: '●',
                fg: Color::Red,
                bg: Color::Black,
                bold: true,
            },
        );
        let i = buf.idx(1, 1);
        assert!(buf.cells[i].bold);
        buf.clear(Color::Black);
        assert!(!buf.cells[i].bold);
        assert_eq!(buf.cells[i].ch, ' ');
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut buf = CellBuffer::new(2, 2);
        buf.set(
            5,
            5,
            Cell {
                ch: 'x',
                ..Cell::default()
            },
        );
        assert!(buf.cells.iter().all(|c| c.ch == ' '));
    }
}
