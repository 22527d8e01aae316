//! The structured serialization contract.
//!
//! A type takes part in zio serialization by implementing `ZioWrite` and
//! `ZioRead`. Neither trait writes anything on the implementor's behalf, so the
//! same impl works for a top-level record and for a value embedded in another
//! record's fields. Records that carry a format version implement `Versioned`
//! and go through `write_record`/`read_record_into`.

use crate::backend::{Sink, Source};
use crate::digest::Digest;
use crate::error::Result;
use crate::reader::ZioReader;
use crate::writer::ZioWriter;

/// A type that can write itself to a zio stream.
pub trait ZioWrite {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()>;
}

/// A type that can repopulate an existing instance from a zio stream.
///
/// Reading in place keeps the instance's identity, which the collection
/// helpers rely on when filling pre-sized collections.
pub trait ZioRead {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()>;
}

/// A type that can construct a fresh instance from a zio stream.
///
/// Every `ZioRead + Default` type spawns by reading into its default value.
/// Types without a sensible default implement this directly.
pub trait ZioSpawn: Sized {
    fn zio_spawn<S: Source, D: Digest>(input: &mut ZioReader<S, D>) -> Result<Self>;
}

impl<T: ZioRead + Default> ZioSpawn for T {
    fn zio_spawn<S: Source, D: Digest>(input: &mut ZioReader<S, D>) -> Result<Self> {
        let mut value = T::default();
        value.zio_read(input)?;
        Ok(value)
    }
}

/// A record whose encoding starts with a compact-integer version tag.
///
/// The writer always emits `VERSION`. The reader hands whatever version it
/// finds to `read_fields`, which owns any compatibility logic.
pub trait Versioned {
    /// The version this build writes.
    const VERSION: i32;

    fn write_fields<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()>;

    fn read_fields<S: Source, D: Digest>(
        &mut self,
        version: i32,
        input: &mut ZioReader<S, D>,
    ) -> Result<()>;
}

macro_rules! primitive_zio {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl ZioWrite for $ty {
                fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
                    out.$write(*self)
                }
            }

            impl ZioRead for $ty {
                fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
                    *self = input.$read()?;
                    Ok(())
                }
            }
        )*
    };
}

primitive_zio! {
    bool => write_bool, read_bool;
    i8 => write_byte, read_byte;
    u8 => write_u8, read_u8;
    char => write_char, read_char;
    i16 => write_short, read_short;
    i32 => write_int, read_int;
    i64 => write_long, read_long;
    f32 => write_float, read_float;
    f64 => write_double, read_double;
}

impl ZioWrite for String {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_str(self)
    }
}

impl ZioRead for String {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        *self = input.read_str()?;
        Ok(())
    }
}

impl ZioWrite for str {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_str(self)
    }
}

/// Options are written with a presence flag, like `write_nullable`.
impl<T: ZioWrite> ZioWrite for Option<T> {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_nullable(self.as_ref())
    }
}

impl<T: ZioSpawn> ZioRead for Option<T> {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        *self = input.read_nullable()?;
        Ok(())
    }
}

/// Vectors are written as a list: a 4-byte count, then the items.
impl<T: ZioWrite> ZioWrite for Vec<T> {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        out.write_list(self)
    }
}

impl<T: ZioSpawn> ZioRead for Vec<T> {
    fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
        *self = input.read_list()?;
        Ok(())
    }
}

impl<T: ZioWrite + ?Sized> ZioWrite for &T {
    fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
        (**self).zio_write(out)
    }
}
