use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use noodles::bgzf;
use noodles::core::Region;
use noodles::csi::BinningIndex;
use noodles::tabix;
use tracing::{debug, warn};

use crate::annotation::GtfRecord;
use crate::error::{GvizError, GvizResult};

/// Genomic interval to fetch from an annotation file (1-based, inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionQuery {
    pub seqname: String,
    pub start: u64,
    pub end: u64,
}

impl RegionQuery {
    pub fn new(seqname: impl Into<String>, start: u64, end: u64) -> GvizResult<Self> {
        let seqname = seqname.into();
        if seqname.is_empty() {
            return Err(GvizError::Annotation(
                "region sequence name must not be empty".to_owned(),
            ));
        }
        if end < start {
            return Err(GvizError::InvalidRange {
                start: start as f64,
                end: end as f64,
            });
        }
        Ok(Self {
            seqname,
            start: start.max(1),
            end: end.max(1),
        })
    }
}

/// Reads the GTF records overlapping `query` from `path`.
///
/// A sibling `<path>.tbi` index switches to a tabix region query over the
/// BGZF file; otherwise the file is scanned in full (BGZF-decompressed when
/// it ends in `.gz`/`.bgz`).
pub fn read_region(path: &Path, query: &RegionQuery) -> GvizResult<Vec<GtfRecord>> {
    let index_path = tabix_index_path(path);
    let records = if index_path.is_file() {
        read_indexed(path, query)?
    } else {
        read_scan(path, query)?
    };

    debug!(
        path = %path.display(),
        seqname = %query.seqname,
        start = query.start,
        end = query.end,
        records = records.len(),
        indexed = index_path.is_file(),
        "read annotation region"
    );
    Ok(records)
}

fn tabix_index_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".tbi");
    PathBuf::from(raw)
}

fn is_bgzf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| matches!(extension, "gz" | "bgz"))
}

fn read_indexed(path: &Path, query: &RegionQuery) -> GvizResult<Vec<GtfRecord>> {
    let mut reader = tabix::io::indexed_reader::Builder::default().build_from_path(path)?;
    let region: Region = format!("{}:{}-{}", query.seqname, query.start, query.end)
        .parse()
        .map_err(|err| GvizError::Annotation(format!("invalid region: {err}")))?;

    let mut records = Vec::new();
    let header = reader.index().header().ok_or_else(|| {
        GvizError::Annotation(format!("tabix index for `{}` has no header", path.display()))
    })?;
    // Sequences missing from the index have no features.
    if header
        .reference_sequence_names()
        .get_index_of(region.name())
        .is_none()
    {
        warn!(seqname = %query.seqname, "sequence not present in tabix index");
        return Ok(records);
    }

    for result in reader.query(&region)? {
        let hit = result?;
        let line: &str = hit.as_ref();
        push_line(&mut records, line, query);
    }
    Ok(records)
}

fn read_scan(path: &Path, query: &RegionQuery) -> GvizResult<Vec<GtfRecord>> {
    let file = File::open(path)?;
    let inner: Box<dyn Read> = if is_bgzf_path(path) {
        Box::new(bgzf::Reader::new(file))
    } else {
        Box::new(file)
    };

    let mut records = Vec::new();
    for line in BufReader::new(inner).lines() {
        push_line(&mut records, &line?, query);
    }
    Ok(records)
}

fn push_line(records: &mut Vec<GtfRecord>, line: &str, query: &RegionQuery) {
    if line.is_empty() || line.starts_with('#') {
        return;
    }

    match GtfRecord::parse_line(line) {
        Ok(record) if record.overlaps(&query.seqname, query.start, query.end) => {
            records.push(record);
        }
        Ok(_) => {}
        Err(err) => warn!(%err, "skipping malformed gtf line"),
    }
}
