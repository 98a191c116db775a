use super::protocol::{FRAME_MAGIC, HEADER_SIZE, MAX_BODY_LEN};
use async_std::io::{Read, ReadExt, Write, WriteExt};
use std::io;

/// Reads length-prefixed frames from any async byte source.
pub struct PacketDecoder<R> {
    stream: R,
}

impl<R: Read + Unpin> PacketDecoder<R> {
    pub fn new(stream: R) -> Self {
        Self { stream }
    }

    /// Returns the next frame body.
    pub async fn read(&mut self) -> io::Result<Vec<u8>> {
        let mut header = [0; HEADER_SIZE];
        self.stream.read_exact(&mut header).await?;

        if header[0] != FRAME_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid frame magic: {:#04x}", header[0]),
            ));
        }

        let length = u16::from_be_bytes([header[1], header[2]]) as usize;
        let mut body = vec![0; length];
        self.stream.read_exact(&mut body).await?;
        Ok(body)
    }
}

/// Writes length-prefixed frames to any async byte sink.
pub struct PacketEncoder<W> {
    stream: W,
}

impl<W: Write + Unpin> PacketEncoder<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }

    pub async fn write(&mut self, body: &[u8]) -> io::Result<()> {
        if body.len() > MAX_BODY_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame body too large: {} bytes", body.len()),
            ));
        }

        let mut frame = Vec::with_capacity(HEADER_SIZE + body.len());
        frame.push(FRAME_MAGIC);
        frame.extend_from_slice(&(body.len() as u16).to_be_bytes());
        frame.extend_from_slice(body);
        self.stream.write_all(&frame).await
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        self.stream.flush().await
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_std::io::Cursor;
    use futures_lite::future::block_on;

    #[test]
    fn frames_survive_a_byte_stream() {
        let bytes = block_on(async {
            let mut encoder = PacketEncoder::new(Vec::new());
            encoder.write(b"first").await.unwrap();
            encoder.write(b"").await.unwrap();
            encoder.write(b"third frame").await.unwrap();
            encoder.into_inner()
        });
        assert_eq!(&bytes[..HEADER_SIZE], &[FRAME_MAGIC, 0, 5]);

        let mut decoder = PacketDecoder::new(Cursor::new(bytes));
        block_on(async {
            assert_eq!(decoder.read().await.unwrap(), b"first".to_vec());
            assert!(decoder.read().await.unwrap().is_empty());
            assert_eq!(decoder.read().await.unwrap(), b"third frame".to_vec());
            let eof = decoder.read().await.unwrap_err();
            assert_eq!(eof.kind(), io::ErrorKind::UnexpectedEof);
        });
    }

    #[test]
    fn bad_magic_is_invalid_data() {
        let mut decoder = PacketDecoder::new(Cursor::new(vec![0x7e, 0, 1, b'x']));
        let err = block_on(decoder.read()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
