pub mod filter_input;
pub mod progress_bar;
pub mod song_list;
pub mod status_bar;
