#[macro_use]
extern crate log;

pub mod blast;
pub mod bounds;
pub mod fasta;
pub mod filter;
pub mod genbank;
pub mod metrics;
pub mod output;
pub mod reader;
pub mod record;
pub mod report;
pub mod seq;
pub mod store;

pub use crate::bounds::{Bounds, BoundsSpec};
pub use crate::filter::{filter_fastq, filter_store, FilterOpts};
pub use crate::record::Read;
pub use crate::store::RecordStore;
