pub mod packet;
pub mod protocol;

use async_std::io::{Read, Write};
use async_std::net::TcpStream;
use packets::ToBytes;
use std::io;

use self::packet::{PacketDecoder, PacketEncoder};

/// Write half of the event socket.
pub struct FrameSender<W = TcpStream> {
    encoder: PacketEncoder<W>,
}

/// Read half of the event socket.
pub struct FrameReceiver<R = TcpStream> {
    decoder: PacketDecoder<R>,
}

/// One frame read off the socket. A malformed envelope does not poison the
/// stream: the next frame starts at the next header.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Event { name: String, data: Vec<u8> },
    Malformed { len: usize, reason: String },
}

/// Connects to the world server and splits the socket into both halves.
pub async fn connect(addr: &str) -> io::Result<(FrameReceiver, FrameSender)> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true).ok();
    let receiver = FrameReceiver::new(PacketDecoder::new(stream.clone()));
    let sender = FrameSender::new(PacketEncoder::new(stream));
    Ok((receiver, sender))
}

impl<W: Write + Unpin> FrameSender<W> {
    pub fn new(encoder: PacketEncoder<W>) -> Self {
        Self { encoder }
    }

    /// Sends an already encoded frame body.
    pub async fn send(&mut self, body: &[u8]) -> io::Result<()> {
        self.encoder.write(body).await
    }

    pub async fn send_packet<T: ToBytes>(&mut self, packet: &T) -> io::Result<()> {
        let body = packet
            .to_bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.send(&body).await
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush().await
    }

    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }
}

impl<R: Read + Unpin> FrameReceiver<R> {
    pub fn new(decoder: PacketDecoder<R>) -> Self {
        Self { decoder }
    }

    /// Only transport failures are errors; a body that is not an event
    /// envelope comes back as [`Frame::Malformed`].
    pub async fn receive(&mut self) -> io::Result<Frame> {
        let body = self.decoder.read().await?;
        Ok(match packets::split_frame(&body) {
            Ok((name, data)) => Frame::Event { name, data },
            Err(err) => Frame::Malformed {
                len: body.len(),
                reason: err.to_string(),
            },
        })
    }
}
