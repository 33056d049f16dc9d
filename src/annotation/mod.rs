//! Gene annotations for gene tracks: GTF records, gene models and region reads.

mod gtf;
mod reader;

pub use gtf::{Exon, Gene, GtfRecord, Strand, genes_from_records};
pub use reader::{RegionQuery, read_region};

use std::path::Path;

use crate::error::GvizResult;

/// Reads and assembles the genes overlapping `query` from a GTF file.
pub fn load_genes(path: &Path, query: &RegionQuery) -> GvizResult<Vec<Gene>> {
    Ok(genes_from_records(read_region(path, query)?))
}
