use std::io::{ErrorKind, Read, Seek, SeekFrom};

use log::warn;

use crate::{version::Fingerprint, Error};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Parser<T: Read + Seek>(T);

impl<T: Read + Seek> Parser<T> {
    pub fn new(reader: T) -> Self {
        Self(reader)
    }

    /// Reads up to `buf.len()` bytes starting at `offset`.
    ///
    /// Only stops short at the end of the source, so a return value below
    /// `buf.len()` always means the data ran out.
    pub fn read_at(&mut self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        self.0.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.0.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        Ok(filled)
    }

    /// Reads the version fingerprint, `None` if the header is too short to hold one.
    pub fn read_fingerprint(&mut self) -> Result<Option<Fingerprint>, Error> {
        let mut buf = [0; Fingerprint::SIZE];
        let read = self.read_at(&mut buf, 0).map_err(Error::FileOperationFailed)?;

        if read == buf.len() {
            Ok(Some(Fingerprint::from_bytes(&buf)))
        } else {
            warn!(
                "Failed to read version info: got {read:#x} bytes, expected {:#x}",
                buf.len()
            );
            Ok(None)
        }
    }

    /// Reads `N` little endian words at `offset`, which must all be present.
    pub fn read_u32_table<const N: usize>(&mut self, offset: u64) -> Result<[u32; N], Error> {
        let mut raw = vec![0; N * 4];
        let read = self.read_at(&mut raw, offset).map_err(Error::FileOperationFailed)?;
        if read != raw.len() {
            return Err(Error::ShortRead {
                expected: raw.len(),
                found: read,
            });
        }

        let mut table = [0; N];
        for (word, bytes) in table.iter_mut().zip(raw.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_at_stops_at_end() {
        let mut parser = Parser::new(Cursor::new(vec![1, 2, 3, 4, 5]));
        let mut buf = [0; 4];

        assert_eq!(parser.read_at(&mut buf, 0).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);

        assert_eq!(parser.read_at(&mut buf, 3).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);

        assert_eq!(parser.read_at(&mut buf, 9).unwrap(), 0);
    }

    #[test]
    fn short_fingerprint_is_none() {
        let mut parser = Parser::new(Cursor::new(vec![0x67; 12]));
        assert!(parser.read_fingerprint().unwrap().is_none());
    }

    #[test]
    fn u32_table_is_little_endian() {
        let mut data = vec![0xFF; 8];
        data.extend_from_slice(&[0x78, 0x56, 0x34, 0x12, 0x01, 0, 0, 0]);
        let mut parser = Parser::new(Cursor::new(data));

        assert_eq!(parser.read_u32_table::<2>(8).unwrap(), [0x1234_5678, 1]);
    }

    #[test]
    fn u32_table_reports_short_read() {
        let mut parser = Parser::new(Cursor::new(vec![0; 10]));
        match parser.read_u32_table::<4>(0) {
            Err(Error::ShortRead { expected, found }) => {
                assert_eq!(expected, 16);
                assert_eq!(found, 10);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
