//! Client for retrieving problem metadata and test cases from pbinfo.ro.
//!
//! The site has no API, so everything here is scraped from rendered HTML.
//! See [`pbinfo::PbInfoClient`] for the entry points.

pub mod config;
pub mod html;
pub mod pbinfo;
pub mod utils;
