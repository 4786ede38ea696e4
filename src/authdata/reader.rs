use super::AuthDataError;

/// Forward-only cursor over a borrowed buffer.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Borrow exactly `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], AuthDataError> {
        if n > self.remaining() {
            return Err(AuthDataError::BufferUnderrun {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AuthDataError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_bytes_as_hex(&mut self, n: usize) -> Result<String, AuthDataError> {
        self.read_bytes(n).map(hex::encode)
    }

    pub fn read_u8(&mut self) -> Result<u8, AuthDataError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, AuthDataError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, AuthDataError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Everything from the cursor to the end; the cursor moves to the end.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }

    /// Borrow the unread tail without advancing.
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
