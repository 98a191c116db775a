mod chat_message;
pub use chat_message::ChatMessage;

mod join_map;
pub use join_map::JoinMap;

mod movement;
pub use movement::Move;
