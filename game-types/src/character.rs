use serde::Serialize;

/// Partial update of the HUD character panel. Only set fields changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharacterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl CharacterPatch {
    pub fn hp(hp: i32) -> Self {
        Self {
            hp: Some(hp),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hp.is_none() && self.exp.is_none() && self.level.is_none()
    }
}
