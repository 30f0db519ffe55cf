//! Client core for the tune song backend: data model, configuration, token
//! storage, REST client and the search / liked-songs controllers the
//! terminal UI drives.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod interaction;
pub mod liked;
pub mod now_playing;
pub mod platform;
pub mod search;
pub mod song;
pub mod token;

#[cfg(test)]
mod testing;
