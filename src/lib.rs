pub mod cell;
pub mod config;
pub mod csv;
mod csv_hasher;
mod csv_ingest_pipeline;
pub mod csv_row_codec;
pub mod csv_row_diff;
pub mod csv_writer;
pub mod diff_result;
pub mod error;
pub mod logging;
pub mod report;
pub mod row;
pub mod row_set;
pub mod source_kind;
pub mod strategy;
pub mod thread_scope_strategy;
pub mod value_equivalence;
