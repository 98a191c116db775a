use futures_lite::future::Boxed;
use game_types::{MapMeta, NpcMeta, Portal};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no such map: {0}")]
    NotFound(String),
}

/// Remote lookup of map and NPC metadata. Futures are polled from the tick
/// loop, so implementations must not block the caller.
pub trait MetadataSource: Send + Sync {
    fn fetch_map(&self, map_key: &str) -> Boxed<Result<MapMeta, FetchError>>;
    fn fetch_npcs(&self, map_key: &str) -> Boxed<Result<Vec<NpcMeta>, FetchError>>;
}

/// Map row as served by the HTTP API. Portals and the start tile travel
/// inside `map_data` as a JSON string.
#[derive(Debug, Deserialize)]
struct MapRecord {
    key: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    json_file: String,
    #[serde(default)]
    tileset_file: String,
    #[serde(default)]
    tile_width: u32,
    #[serde(default)]
    tile_height: u32,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    map_data: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MapData {
    #[serde(default)]
    start_position: [i32; 2],
    #[serde(default)]
    teleports: Vec<Portal>,
}

impl MapRecord {
    fn into_meta(self) -> Result<MapMeta, FetchError> {
        let data = match self.map_data.as_deref().map(str::trim) {
            None | Some("") => MapData::default(),
            Some(raw) => serde_json::from_str(raw)?,
        };
        let display_name = if self.display_name.is_empty() {
            self.key.clone()
        } else {
            self.display_name
        };
        Ok(MapMeta {
            key: self.key,
            display_name,
            json_file: self.json_file,
            tileset_file: self.tileset_file,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            width: self.width,
            height: self.height,
            start_position: data.start_position,
            teleports: data.teleports,
        })
    }
}

pub(crate) fn decode_map(body: &[u8]) -> Result<MapMeta, FetchError> {
    serde_json::from_slice::<MapRecord>(body)?.into_meta()
}

/// Metadata over the game's REST API. Requests run on the blocking pool.
#[derive(Clone)]
pub struct HttpMetadataSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpMetadataSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn get(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url, "Fetching metadata");
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

impl MetadataSource for HttpMetadataSource {
    fn fetch_map(&self, map_key: &str) -> Boxed<Result<MapMeta, FetchError>> {
        let url = format!("{}/api/maps/{}", self.base_url, map_key);
        let key = map_key.to_string();
        let client = self.client.clone();
        Box::pin(async_std::task::spawn_blocking(move || {
            match Self::get(&client, &url) {
                Err(FetchError::Status(404)) => Err(FetchError::NotFound(key)),
                other => decode_map(&other?),
            }
        }))
    }

    fn fetch_npcs(&self, map_key: &str) -> Boxed<Result<Vec<NpcMeta>, FetchError>> {
        let url = format!("{}/api/npcs", self.base_url);
        let key = map_key.to_string();
        let client = self.client.clone();
        Box::pin(async_std::task::spawn_blocking(move || {
            tracing::debug!(%url, map_key = %key, "Fetching npcs");
            let response = client.get(&url).query(&[("map_key", &key)]).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            Ok(serde_json::from_slice(&response.bytes()?)?)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::{PortalSource, TilePos};

    #[test]
    fn map_record_unpacks_embedded_map_data() {
        let body = br#"{
            "key": "worldmap",
            "display_name": "World",
            "json_file": "worldmap.json",
            "tileset_file": "tmw_grass_spacing.png",
            "tile_width": 128,
            "tile_height": 128,
            "width": 40,
            "height": 30,
            "map_data": "{\"start_position\":[6,12],\"teleports\":[{\"from\":{\"x\":14,\"y\":15},\"to_map\":\"city2\",\"to_position\":[13,2]}]}",
            "created_at": null
        }"#;
        let meta = decode_map(body).unwrap();
        assert_eq!(meta.start_position, [6, 12]);
        assert_eq!(meta.teleports.len(), 1);
        assert_eq!(meta.teleports[0].from, PortalSource::Point { x: 14, y: 15 });
        assert_eq!(meta.teleports[0].destination(), TilePos::new(13, 2));
        assert_eq!(meta.pixel_bounds(), Some((5120.0, 3840.0)));
    }

    #[test]
    fn empty_map_data_defaults() {
        let meta = decode_map(br#"{"key":"void","tile_width":32,"tile_height":32,"map_data":"{}"}"#)
            .unwrap();
        assert_eq!(meta.display_name, "void");
        assert_eq!(meta.start_position, [0, 0]);
        assert!(meta.teleports.is_empty());
    }

    #[test]
    fn malformed_map_data_is_a_decode_error() {
        let err = decode_map(br#"{"key":"bad","map_data":"{not json"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
