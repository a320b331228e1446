use crate::error::{AbifError, Result};

/// Big-endian cursor over a byte buffer.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(take(self.bytes, &mut self.pos, 1, field)?[0])
    }

    #[inline]
    pub fn read_u16_be(&mut self, field: &'static str) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_arr::<2>(field)?))
    }

    #[inline]
    pub fn read_i16_be(&mut self, field: &'static str) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_arr::<2>(field)?))
    }

    #[inline]
    pub fn read_u32_be(&mut self, field: &'static str) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_arr::<4>(field)?))
    }

    #[inline]
    pub fn read_i32_be(&mut self, field: &'static str) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_arr::<4>(field)?))
    }

    #[inline]
    pub fn read_arr<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let s = take(self.bytes, &mut self.pos, N, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(s);
        Ok(out)
    }

    #[inline]
    pub fn read_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8]> {
        take(self.bytes, &mut self.pos, n, field)
    }
}

#[inline]
pub fn take<'a>(
    bytes: &'a [u8],
    pos: &mut usize,
    n: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    let s = slice_at(bytes, *pos, n, field)?;
    *pos += n;
    Ok(s)
}

#[inline]
pub fn slice_at<'a>(
    bytes: &'a [u8],
    off: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    let out_of_bounds = || AbifError::OutOfBounds {
        field,
        offset: off,
        len,
        buffer_len: bytes.len(),
    };
    let end = off.checked_add(len).ok_or_else(out_of_bounds)?;
    bytes.get(off..end).ok_or_else(out_of_bounds)
}
