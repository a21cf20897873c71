use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::cipher::{self, SceneVariant};

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_ciphered_bytes(&mut self, n: usize, variant: SceneVariant) -> io::Result<Vec<u8>> {
        let mut bytes = self.read_bytes(n)?;
        cipher::decrypt_in_place(variant, &mut bytes);
        Ok(bytes)
    }

    pub fn read_ciphered_u8(&mut self, variant: SceneVariant) -> io::Result<u8> {
        let bytes = self.read_ciphered_bytes(1, variant)?;
        Ok(bytes[0])
    }

    pub fn read_ciphered_u16(&mut self, variant: SceneVariant) -> io::Result<u16> {
        let bytes = self.read_ciphered_bytes(2, variant)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

pub struct LittleEndianWriter<W> {
    inner: W,
}

impl<W: Write + Seek> LittleEndianWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_all(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.inner.write_all(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    pub fn write_ciphered_bytes(&mut self, bytes: &[u8], variant: SceneVariant) -> io::Result<()> {
        self.inner.write_all(&cipher::encrypt(variant, bytes))
    }

    pub fn write_ciphered_u16(&mut self, value: u16, variant: SceneVariant) -> io::Result<()> {
        self.write_ciphered_bytes(&value.to_le_bytes(), variant)
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_little_endian_scalars() {
        let mut r = LittleEndianReader::new(Cursor::new(vec![0xBD, 0x00, 0x03, 0x78, 0x56]));
        assert_eq!(r.read_u16().expect("u16"), 189);
        assert_eq!(r.read_u8().expect("u8"), 3);
        assert_eq!(r.read_bytes(2).expect("bytes"), vec![0x78, 0x56]);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn ciphered_scalars_roundtrip_through_writer() {
        let variant = SceneVariant::from_scene(7);
        let mut w = LittleEndianWriter::new(Cursor::new(vec![0u8; 4]));
        w.write_ciphered_u16(12345, variant).expect("write");
        w.write_u16(777).expect("write");
        let bytes = w.into_inner().into_inner();
        assert_ne!(&bytes[..2], &12345u16.to_le_bytes());

        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        assert_eq!(r.read_ciphered_u16(variant).expect("read"), 12345);
        assert_eq!(r.read_u16().expect("read"), 777);
    }

    #[test]
    fn ciphered_u8_reads_one_decrypted_byte() {
        let variant = SceneVariant::from_scene(2);
        let bytes = cipher::encrypt(variant, &[42, 7]);
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        r.skip(1).expect("skip");
        assert_eq!(r.read_ciphered_u8(variant).expect("u8"), 7);
        assert!(r.read_ciphered_u8(variant).is_err());
    }
}
