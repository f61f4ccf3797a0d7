//! Core library components.
//!
//! Discovery, checksums, the vault codec, cipher backends, ignore-list
//! maintenance, and the synchronization engine that ties them together.

pub mod checksum;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod domain;
pub mod engine;
pub mod ignore;
