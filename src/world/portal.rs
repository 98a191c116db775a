use game_types::{Portal, TilePos};

/// First portal, in declaration order, whose source zone contains `tile`.
pub fn detect(tile: TilePos, portals: &[Portal]) -> Option<&Portal> {
    portals.iter().find(|portal| portal.from.contains(tile))
}
