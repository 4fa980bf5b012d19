//! PokeBase API client and types.
//!
//! This module provides the interface for talking to a running PokeBase server.

mod client;
pub mod error;
pub mod types;

pub use client::PokedexClient;
pub use error::ApiError;
pub use types::{Candidate, PokemonPage};
