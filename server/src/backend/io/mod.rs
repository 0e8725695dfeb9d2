//! # IO Module
//!
//! The interface layer between HTTP clients and the domain services. It owns
//! request and response serialization, authentication of incoming requests
//! and the translation of domain errors into status codes.

pub mod rest;

pub use rest::*;
