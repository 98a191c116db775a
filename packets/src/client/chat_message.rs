use serde::Serialize;

use crate::ToBytes;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender_id: u32,
    pub text: String,
}

impl ToBytes for ChatMessage {
    const EVENT: &'static str = "chat_message";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split_frame;

    #[test]
    fn frame_splits_back_into_event_and_payload() {
        let bytes = ChatMessage {
            sender_id: 3,
            text: "hello \"world\"".into(),
        }
        .to_bytes()
        .unwrap();
        let (event, payload) = split_frame(&bytes).unwrap();
        assert_eq!(event, "chat_message");
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["sender_id"], 3);
        assert_eq!(value["text"], "hello \"world\"");
    }
}
