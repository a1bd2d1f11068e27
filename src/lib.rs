//! Gazette serves the public face of a blog: a front page listing every
//! published post and a detail page per slug. The post collection itself is
//! written by other tooling; this crate only reads it.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
