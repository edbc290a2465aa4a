//! # simrec API
//!
//! actix-web REST surface over a shared [`simrec_core::Recommender`].

pub mod rest;

pub use rest::{ApiConfig, RestApi};
