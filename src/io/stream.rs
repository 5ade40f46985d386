//! Reading and writing fixed-width numbers in an explicit byte order.
//!
//! [`OrderedReader`] and [`OrderedWriter`] wrap any `io::Read`/`io::Write`
//! and carry a [`ByteOrder`] flag that decides how multi-byte values are
//! interpreted. The flag can be changed at any point; it only affects the
//! operations after the change.

use std::io::{self, Read, Write};

use byteorder::{
    BigEndian as Be,
    LittleEndian as Le,
    ReadBytesExt,
    WriteBytesExt,
};

use crate::io::{Error, ErrorKind};


/// The byte order of multi-byte numbers in a binary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the host platform.
    pub fn native() -> Self {
        #[cfg(target_endian = "big")]
        { ByteOrder::BigEndian }

        #[cfg(target_endian = "little")]
        { ByteOrder::LittleEndian }
    }
}


// ===============================================================================================
// ===== Reader
// ===============================================================================================

macro_rules! gen_read {
    ($( $(#[$attr:meta])* $name:ident => $method:ident, $ty:ty; )*) => {
        $(
            $(#[$attr])*
            pub fn $name(&mut self) -> Result<$ty, Error> {
                let v = match self.order {
                    ByteOrder::BigEndian => self.inner.$method::<Be>()?,
                    ByteOrder::LittleEndian => self.inner.$method::<Le>()?,
                };
                self.offset += std::mem::size_of::<$ty>() as u64;
                Ok(v)
            }
        )*
    }
}

/// Reads numbers from an underlying reader in a configurable byte order.
///
/// Every method either reads the complete value or fails: if the underlying
/// reader ends in the middle of a value, [`ErrorKind::UnexpectedEof`] is
/// returned.
#[derive(Debug)]
pub struct OrderedReader<R: Read> {
    inner: R,
    order: ByteOrder,
    offset: u64,
}

impl<R: Read> OrderedReader<R> {
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            offset: 0,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Changes the byte order for all following reads.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Number of bytes consumed through this reader so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fills `buf` completely.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.inner.read_exact(buf)?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    /// Reads exactly `N` bytes into an array.
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Skips `count` bytes.
    pub fn skip(&mut self, count: u64) -> Result<(), Error> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        self.offset += skipped;
        if skipped < count {
            return Err(ErrorKind::UnexpectedEof.into());
        }

        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let v = self.inner.read_u8()?;
        self.offset += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        let v = self.inner.read_i8()?;
        self.offset += 1;
        Ok(v)
    }

    gen_read! {
        read_u16 => read_u16, u16;
        read_i16 => read_i16, i16;
        read_u32 => read_u32, u32;
        read_i32 => read_i32, i32;
        read_i64 => read_i64, i64;
        read_f32 => read_f32, f32;
        read_f64 => read_f64, f64;
    }
}


// ===============================================================================================
// ===== Writer
// ===============================================================================================

macro_rules! gen_write {
    ($( $name:ident, $ty:ty; )*) => {
        $(
            pub fn $name(&mut self, v: $ty) -> Result<(), Error> {
                match self.order {
                    ByteOrder::BigEndian => self.inner.$name::<Be>(v)?,
                    ByteOrder::LittleEndian => self.inner.$name::<Le>(v)?,
                }
                self.offset += std::mem::size_of::<$ty>() as u64;
                Ok(())
            }
        )*
    }
}

/// Writes numbers to an underlying writer in a configurable byte order.
#[derive(Debug)]
pub struct OrderedWriter<W: Write> {
    inner: W,
    order: ByteOrder,
    offset: u64,
}

impl<W: Write> OrderedWriter<W> {
    pub fn new(inner: W, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            offset: 0,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Changes the byte order for all following writes.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Number of bytes written through this writer so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.inner.write_all(buf)?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<(), Error> {
        self.inner.write_u8(v)?;
        self.offset += 1;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> Result<(), Error> {
        self.inner.write_i8(v)?;
        self.offset += 1;
        Ok(())
    }

    gen_write! {
        write_u16, u16;
        write_i16, i16;
        write_u32, u32;
        write_i32, i32;
        write_i64, i64;
        write_f32, f32;
        write_f64, f64;
    }
}
