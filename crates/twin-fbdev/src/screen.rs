//! Compositor screen.
//!
//! The backend only needs one thing from a screen: flush whatever changed
//! since the last flush into a [`SpanSink`]. [`DamageScreen`] is a minimal
//! single-window screen that tracks a damage bounding box over an ARGB
//! pixel store.

use alloc::vec;
use alloc::vec::Vec;

use crate::span::SpanSink;

pub trait Screen {
    /// Emit every damaged span to `sink` and clear the damage.
    fn update(&mut self, sink: &mut dyn SpanSink);

    fn has_damage(&self) -> bool;
}

/// Inclusive damage bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Damage {
    fn union(self, other: Damage) -> Damage {
        Damage {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

const MAX_SIDE: u16 = i16::MAX as u16;

pub struct DamageScreen {
    width: u16,
    height: u16,
    pixels: Vec<u32>,
    damage: Option<Damage>,
}

impl DamageScreen {
    /// Create a screen cleared to `background`, fully damaged so the first
    /// update paints everything.
    ///
    /// Spans carry `i16` coordinates, so each side is capped at `i16::MAX`.
    pub fn new(width: u16, height: u16, background: u32) -> Self {
        let width = width.min(MAX_SIDE);
        let height = height.min(MAX_SIDE);
        let mut screen = Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
            damage: None,
        };
        if width > 0 && height > 0 {
            screen.damage(0, 0, width - 1, height - 1);
        }
        screen
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pending_damage(&self) -> Option<Damage> {
        self.damage
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn set_pixel(&mut self, x: u16, y: u16, argb: u32) {
        self.fill(x, y, x, y, argb);
    }

    /// Fill `left..=right` x `top..=bottom`, clipped to the screen.
    pub fn fill(&mut self, left: u16, top: u16, right: u16, bottom: u16, argb: u32) {
        if left >= self.width || top >= self.height || left > right || top > bottom {
            return;
        }
        let right = right.min(self.width - 1);
        let bottom = bottom.min(self.height - 1);

        for y in top..=bottom {
            let start = self.index(left, y);
            let end = self.index(right, y);
            self.pixels[start..=end].fill(argb);
        }
        self.damage(left, top, right, bottom);
    }

    /// Mark a region as changed without touching its pixels.
    ///
    /// The region is clipped to the screen; one starting off screen or with
    /// reversed corners is ignored.
    pub fn damage(&mut self, left: u16, top: u16, right: u16, bottom: u16) {
        if left >= self.width || top >= self.height || left > right || top > bottom {
            return;
        }
        let area = Damage {
            left,
            top,
            right: right.min(self.width.saturating_sub(1)),
            bottom: bottom.min(self.height.saturating_sub(1)),
        };
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(area),
            None => area,
        });
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Screen for DamageScreen {
    fn update(&mut self, sink: &mut dyn SpanSink) {
        let Some(damage) = self.damage.take() else {
            return;
        };

        for y in damage.top..=damage.bottom {
            let row_start = self.index(damage.left, y);
            let row = &self.pixels[row_start..=self.index(damage.right, y)];

            // One span per run of identical color
            let mut run_start = 0;
            while run_start < row.len() {
                let color = row[run_start];
                let run_len = row[run_start..]
                    .iter()
                    .take_while(|&&c| c == color)
                    .count();
                let left = damage.left as usize + run_start;
                let right = left + run_len - 1;
                sink.put_span(
                    left as i16,
                    y as i16,
                    right as i16,
                    &row[run_start..run_start + run_len],
                );
                run_start += run_len;
            }
        }
    }

    fn has_damage(&self) -> bool {
        self.damage.is_some()
    }
}
