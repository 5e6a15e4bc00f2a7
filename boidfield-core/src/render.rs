//! Draw commands issued by the simulation each tick.
//!
//! The core never touches a real surface; front ends implement
//! [`RenderTarget`] on whatever they draw to.

use alloc::vec::Vec;

use crate::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const BOID: Color = Color::rgb(0, 255, 0);
    pub const LINK: Color = Color::rgb(0, 255, 0);
    pub const LINK_SIGNAL: Color = Color::rgb(180, 255, 120);
    pub const BAD_PARTICLE: Color = Color::rgb(255, 40, 60);
    pub const EXPLOSION: Color = Color::rgb(255, 150, 60);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Translucent fill over the whole canvas; leaves motion trails.
    Fade { color: Color, alpha: f64 },
    Circle {
        center: Vector2D,
        radius: f64,
        color: Color,
        glow: f64,
        alpha: f64,
    },
    Line {
        from: Vector2D,
        to: Vector2D,
        color: Color,
        width: f64,
        glow: f64,
        alpha: f64,
    },
}

pub trait RenderTarget {
    fn draw(&mut self, command: DrawCommand);
}

/// Records commands, mostly for tests and headless runs.
impl RenderTarget for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn draw(&mut self, command: DrawCommand) {
        (**self).draw(command);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn draw(&mut self, _command: DrawCommand) {}
}
