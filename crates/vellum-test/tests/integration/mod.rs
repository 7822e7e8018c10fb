#![allow(clippy::unused_async)]
//! Integration tests for the HTTP routes.
//!
//! No database is needed: the repository graph, bitstream bytes and sitemap
//! files are seeded per test.

mod helpers;
mod browse;
mod explore;
mod retrieve;
mod search;
mod sitemap;
mod structure;
