//! Half-block terminal renderer. Reads a [`Session`] snapshot, never mutates it.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::config::Rules;
use crate::session::Session;

/// Height of the game-over overlay in world pixels.
pub const OVERLAY_HEIGHT: i32 = 96;

/// Horizontal position of the bird's left edge in world pixels.
pub const BIRD_X: i32 = 50;

/// World-space band covered by the game-over overlay, as (top, bottom).
pub fn overlay_band(rules: &Rules) -> (i32, i32) {
    let top = rules.game_height / 2 - OVERLAY_HEIGHT / 2;
    (top, top + OVERLAY_HEIGHT)
}

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const DIRT: Rgb = Rgb(210, 185, 110);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
pub const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(20, 20, 20);

// ── Pixel buffer ────────────────────────────────────────────────────────────

/// Two vertical pixels per terminal cell, drawn with the upper half block.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    /// Buffer for a terminal of `cols` x `rows` cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.w = cols as usize;
        self.h = rows as usize * 2;
        self.px.resize(self.w * self.h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev: Option<(Rgb, Rgb)> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if prev != Some((top, bot)) {
                    queue!(
                        out,
                        style::SetForegroundColor(to_color(top)),
                        style::SetBackgroundColor(to_color(bot))
                    )?;
                    prev = Some((top, bot));
                }
                let glyph = if top == bot { ' ' } else { '\u{2580}' }; // ▀
                queue!(out, style::Print(glyph))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn to_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_number(buf: &mut PixelBuf, left: i32, top: i32, n: u32, fg: Rgb) {
    for (i, ch) in n.to_string().bytes().enumerate() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        let x0 = left + i as i32 * 4;
        for row in 0..5 {
            for col in 0..3 {
                if glyph[row * 3 + col] == 1 {
                    let (x, y) = (x0 + col as i32, top + row as i32);
                    buf.set(x + 1, y + 1, SHADOW);
                    buf.set(x, y, fg);
                }
            }
        }
    }
}

fn number_width(n: u32) -> i32 {
    n.to_string().len() as i32 * 4 - 1
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// World-to-pixel mapping for the current buffer size.
struct View {
    sx: f64,
    sy: f64,
}

impl View {
    fn new(buf: &PixelBuf, rules: &Rules) -> Self {
        Self {
            sx: buf.width() as f64 / rules.game_width as f64,
            sy: buf.height() as f64 / rules.game_height as f64,
        }
    }

    fn x(&self, world: i32) -> i32 {
        (world as f64 * self.sx).floor() as i32
    }

    fn y(&self, world: i32) -> i32 {
        (world as f64 * self.sy).floor() as i32
    }

    /// Pixel span of a world length, at least one pixel.
    fn w(&self, world: i32) -> i32 {
        ((world as f64 * self.sx).round() as i32).max(1)
    }

    fn h(&self, world: i32) -> i32 {
        ((world as f64 * self.sy).round() as i32).max(1)
    }
}

/// Draws the whole frame for `session` into `buf`.
pub fn draw(buf: &mut PixelBuf, session: &Session, rules: &Rules) {
    if buf.width() == 0 || buf.height() == 0 {
        return;
    }
    let view = View::new(buf, rules);
    draw_sky(buf);
    draw_pipe(buf, &view, session, rules);
    draw_ground(buf, &view, rules);
    draw_bird(buf, &view, session, rules);
    draw_number(buf, 2, 2, session.score, WHITE);
    if session.is_over() {
        draw_game_over(buf, &view, session, rules);
    }
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.height();
    for y in 0..h {
        let t = (y * 256 / h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.width() {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_pipe(buf: &mut PixelBuf, view: &View, session: &Session, rules: &Rules) {
    let px = view.x(session.pipe_x);
    let pw = view.w(rules.pipe_width);
    let gap_top = view.y(session.pipe_gap_top);
    let gap_bot = view.y(session.pipe_gap_top + rules.pipe_gap);
    let bottom = view.y(rules.game_height);
    let cap_h = view.h(12).max(1);

    for x in 0..pw {
        let c = pipe_shade(x, pw);
        for y in 0..gap_top {
            buf.set(px + x, y, c);
        }
        for y in gap_bot..bottom {
            buf.set(px + x, y, c);
        }
    }
    // Caps: a darker rim at the mouth of each half
    for x in -1..=pw {
        buf.fill_rect(px + x, gap_top - cap_h, 1, cap_h, CAP_DARK);
        buf.fill_rect(px + x, gap_bot, 1, cap_h, CAP_DARK);
    }
}

fn draw_ground(buf: &mut PixelBuf, view: &View, rules: &Rules) {
    let top = view.y(rules.ground_line());
    let w = buf.width() as i32;
    let h = buf.height() as i32;
    buf.fill_rect(0, top, w, 1, GRASS);
    buf.fill_rect(0, top + 1, w, h - top - 1, DIRT);
}

fn draw_bird(buf: &mut PixelBuf, view: &View, session: &Session, rules: &Rules) {
    let x = view.x(BIRD_X);
    let y = view.y(session.bird_y);
    let w = view.w(rules.bird_size);
    let h = view.h(rules.bird_size);

    buf.fill_rect(x, y, w, h, BIRD_BODY);
    if w >= 3 && h >= 3 {
        buf.fill_rect(x, y + h / 2, w / 2, (h / 4).max(1), BIRD_WING);
        buf.set(x + w * 2 / 3, y + h / 4, BIRD_EYE);
        buf.fill_rect(x + w, y + h / 3, (w / 3).max(1), (h / 4).max(1), BIRD_BEAK);
    }
}

fn draw_game_over(buf: &mut PixelBuf, view: &View, session: &Session, rules: &Rules) {
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }
    let (top, bottom) = overlay_band(rules);
    let (y0, y1) = (view.y(top), view.y(bottom));
    let w = buf.width() as i32;
    buf.fill_rect(0, y0, w, (y1 - y0).max(7), PANEL);

    let nw = number_width(session.score);
    let ny = y0 + ((y1 - y0).max(7) - 5) / 2;
    draw_number(buf, (w - nw) / 2, ny, session.score, BIRD_BODY);
}
