//! Shared encoding primitives for the binary model container (C8).
//!
//! Every sequence in the container is prefixed by its own 8-byte
//! little-endian length, matching the layout in spec §6; scalars are
//! written at their natural little-endian width. This is the crate's own
//! stable wire format, not a byte-for-byte reproduction of dlib's internal
//! (variable-length-integer) serialisation.

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::Error;

pub const VERSION: i32 = 1;

pub(crate) fn write_len<W: Write>(w: &mut W, len: usize) -> Result<(), Error> {
    w.write_u64::<LE>(len as u64)?;
    Ok(())
}

pub(crate) fn read_len<R: Read>(r: &mut R) -> Result<usize, Error> {
    Ok(r.read_u64::<LE>()? as usize)
}

pub(crate) fn write_version<W: Write>(w: &mut W) -> Result<(), Error> {
    w.write_i32::<LE>(VERSION)?;
    Ok(())
}

pub(crate) fn read_version<R: Read>(r: &mut R) -> Result<(), Error> {
    let found = r.read_i32::<LE>()?;
    if found != VERSION {
        return Err(Error::UnsupportedVersion { found });
    }
    Ok(())
}
