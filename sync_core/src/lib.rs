//! Core algorithms for converting pooled sequencing SYNC tables into
//! allele frequency summaries
//!
//! The processing chain is
//!
//!   candidate positions -> [`region::merge_points`] -> regions per chromosome
//!   SYNC rows -> [`site::SiteRecord`] -> [`filter::RegionFilter`] -> [`freq::summarize`]
//!
//! with [`output`] handling the text presentation of the results.

#[macro_use]
extern crate log;

pub mod allele;
pub mod config;
pub mod error;
pub mod filter;
pub mod freq;
pub mod output;
pub mod region;
pub mod site;

pub use error::{Result, SyncError};

use std::sync::Arc;

/// Chromosome names are shared across many records so we use Arc<str>
pub type Contig = Arc<str>;
