//! # IO Module
//!
//! HTTP adapter between clients and the domain services. Handlers extract
//! and authenticate the request, call one service method and map the domain
//! result to a `shared` DTO or a [`DomainError`](crate::domain::DomainError) response.

pub mod rest;
