//! Business logic for Parley.
//!
//! Repository and provider traits live here (RPITIT async fns); concrete
//! implementations live in parley-infra. Services are generic over those
//! traits so parley-core never depends on parley-infra.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
