//! Small value types shared by records that describe on-screen layout.
//!
//! Each is written behind a presence flag (`write_point(None)` costs one byte)
//! followed by its fixed-width fields: points and sizes as two 4-byte
//! integers, colors as three unsigned bytes.

use crate::backend::{Sink, Source};
use crate::digest::Digest;
use crate::error::Result;
use crate::reader::ZioReader;
use crate::traits::{ZioRead, ZioWrite};
use crate::writer::ZioWriter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An opaque RGB color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl ZioWrite for Point {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_int(self.x)?;
        out.write_int(self.y)
    }
}

impl ZioRead for Point {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        self.x = input.read_int()?;
        self.y = input.read_int()?;
        Ok(())
    }
}

impl ZioWrite for Size {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_int(self.width)?;
        out.write_int(self.height)
    }
}

impl ZioRead for Size {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        self.width = input.read_int()?;
        self.height = input.read_int()?;
        Ok(())
    }
}

impl ZioWrite for Color {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_u8(self.red)?;
        out.write_u8(self.green)?;
        out.write_u8(self.blue)
    }
}

impl ZioRead for Color {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        self.red = input.read_u8()?;
        self.green = input.read_u8()?;
        self.blue = input.read_u8()?;
        Ok(())
    }
}

impl<S: Sink, D: Digest> ZioWriter<S, D> {
    pub fn write_point(&mut self, point: Option<&Point>) -> Result<()> {
        self.write_nullable(point)
    }

    pub fn write_size(&mut self, size: Option<&Size>) -> Result<()> {
        self.write_nullable(size)
    }

    pub fn write_color(&mut self, color: Option<&Color>) -> Result<()> {
        self.write_nullable(color)
    }
}

impl<S: Source, D: Digest> ZioReader<S, D> {
    pub fn read_point(&mut self) -> Result<Option<Point>> {
        self.read_nullable()
    }

    pub fn read_size(&mut self) -> Result<Option<Size>> {
        self.read_nullable()
    }

    pub fn read_color(&mut self) -> Result<Option<Color>> {
        self.read_nullable()
    }
}
