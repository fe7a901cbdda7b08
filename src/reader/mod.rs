pub mod fastq;

pub use self::fastq::{read_store, read_store_from_path, write_read, write_store, FastqError};
