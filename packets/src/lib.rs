pub mod client;
pub mod server;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Decodes an inbound payload (the `data` half of a frame).
pub trait TryFromBytes {
    fn try_from_bytes(bytes: &[u8]) -> anyhow::Result<Self>
    where
        Self: Sized;
}

impl<T: DeserializeOwned> TryFromBytes for T {
    fn try_from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Encodes an outbound event as a complete frame body:
/// `{"event": EVENT, "data": <self>}`.
pub trait ToBytes: Serialize {
    const EVENT: &'static str;

    fn write_to(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(
            buf,
            &EnvelopeRef {
                event: Self::EVENT,
                data: self,
            },
        )
    }

    fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = vec![];
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    event: &'a str,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<'a> {
    event: String,
    #[serde(borrow)]
    data: Option<&'a RawValue>,
}

/// Splits a frame body into its event name and raw payload bytes.
/// A frame without `data` yields `null` so unit payloads still decode.
pub fn split_frame(body: &[u8]) -> anyhow::Result<(String, Vec<u8>)> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let payload = envelope
        .data
        .map(|raw| raw.get().as_bytes().to_vec())
        .unwrap_or_else(|| b"null".to_vec());
    Ok((envelope.event, payload))
}
