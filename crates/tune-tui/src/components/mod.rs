pub mod liked_pane;
pub mod now_playing;
pub mod search_pane;
