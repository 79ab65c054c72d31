use rand::RngCore;

use crate::error::Error;

/// A sequential stream of bytes.
///
/// Everything in this crate that consumes randomness or expands a seed
/// (key generation, message blinding, the IGF, MGF-TP-1) reads through this
/// trait. Running out of bytes is a hard error; none of the rejection
/// sampling loops retry across an exhausted source.
pub trait ByteSource {
    fn next_byte(&mut self) -> Result<u8, Error>;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        for b in buf.iter_mut() {
            *b = self.next_byte()?;
        }
        Ok(())
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn next_byte(&mut self) -> Result<u8, Error> {
        (**self).next_byte()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        (**self).read_exact(buf)
    }
}

/// Reads a byte slice front to back, then reports exhaustion.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Result<u8, Error> {
        if self.pos >= self.data.len() {
            return Err(Error::SourceExhausted);
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }
}

/// Adapts any [`rand::RngCore`] into a [`ByteSource`]. An RNG never
/// exhausts.
pub struct RngSource<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl<R: RngCore> ByteSource for RngSource<R> {
    fn next_byte(&mut self) -> Result<u8, Error> {
        let mut b = [0u8; 1];
        self.rng.fill_bytes(&mut b);
        Ok(b[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.rng.fill_bytes(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_exhausts() {
        let mut src = SliceSource::new(&[1, 2]);
        assert_eq!(src.next_byte(), Ok(1));
        assert_eq!(src.next_byte(), Ok(2));
        assert_eq!(src.next_byte(), Err(Error::SourceExhausted));
        assert_eq!(src.consumed(), 2);
    }

    #[test]
    fn slice_source_read_exact_partial() {
        let mut src = SliceSource::new(&[7; 3]);
        let mut buf = [0u8; 4];
        assert_eq!(src.read_exact(&mut buf), Err(Error::SourceExhausted));
    }
}
