//! Typed client for music catalog charts and resources.
//!
//! * [`catalog::Client`] fetches charts and resources in one round trip each
//! * [`protocol::catalog`] holds the entity model, request types, URL
//!   builder and response decoders
//! * [`registry`] validates and resolves property expansion per entity kind
//! * [`storefront`] and [`transport`] are the seams to the outside world,
//!   with [`http`] as the production transport
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

#[macro_use]
extern crate log;

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod registry;
pub mod storefront;
pub mod transport;
