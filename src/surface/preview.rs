//! Terminal preview of a [`Stage`].
//!
//! Draws every element as a bracketed label on one terminal row, at the
//! column matching its displayed x-offset. Elements lifted off the strip
//! (mid-insert or mid-delete) are skipped. Useful for watching a queue
//! animate from a headless game loop.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};

use super::{Element, Stage};
use crate::types::TileState;

/// Surface pixels per terminal column.
pub const PIXELS_PER_COLUMN: f32 = 10.0;

/// Elements lifted further than this are not drawn.
const MAX_LIFT: f32 = 50.0;

/// Draw the strip at `row`, back to front by z-index.
pub fn draw_strip<W: Write>(out: &mut W, stage: &Stage, row: u16) -> io::Result<()> {
    let mut elements: Vec<&Element> = stage.elements().iter().collect();
    elements.sort_by_key(|e| e.z_index());

    for element in elements {
        let Some(transform) = stage.transform_of(element.id()) else {
            continue;
        };
        if transform.y.abs() > MAX_LIFT {
            continue;
        }

        let column = (transform.x / PIXELS_PER_COLUMN).round().max(0.0) as u16;
        queue!(out, MoveTo(column, row))?;

        let state = element.state();
        if state.contains(TileState::ACTIVE) {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if state.contains(TileState::XRAY) {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        if state.contains(TileState::UNMATERIALIZED) {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }

        queue!(out, Print(format!("[{}]", label_of(element))), SetAttribute(Attribute::Reset))?;
    }

    out.flush()
}

fn label_of(element: &Element) -> String {
    let stats = &element.stats().text;
    if stats.is_empty() {
        element.markup().label.clone()
    } else {
        format!("{} {}", element.markup().label, stats)
    }
}
