use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::error::{GvizError, GvizResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl Strand {
    fn parse(raw: &str) -> GvizResult<Self> {
        match raw {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            "." | "?" => Ok(Self::Unknown),
            other => Err(GvizError::Annotation(format!("invalid strand `{other}`"))),
        }
    }
}

/// One GTF line. Coordinates are 1-based and inclusive, as in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct GtfRecord {
    pub seqname: String,
    pub source: String,
    pub feature: String,
    pub start: u64,
    pub end: u64,
    pub score: Option<f64>,
    pub strand: Strand,
    pub frame: Option<u8>,
    pub attributes: IndexMap<String, String>,
}

impl GtfRecord {
    pub fn parse_line(line: &str) -> GvizResult<Self> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        let [seqname, source, feature, start, end, score, strand, frame, attributes] =
            fields.as_slice()
        else {
            return Err(GvizError::Annotation(format!(
                "expected 9 tab-separated columns, found {}",
                fields.len()
            )));
        };

        let start = parse_position(start, "start")?;
        let end = parse_position(end, "end")?;
        if end < start {
            return Err(GvizError::Annotation(format!(
                "feature end {end} precedes start {start}"
            )));
        }

        Ok(Self {
            seqname: (*seqname).to_owned(),
            source: (*source).to_owned(),
            feature: (*feature).to_owned(),
            start,
            end,
            score: match *score {
                "." => None,
                raw => Some(raw.parse().map_err(|_| {
                    GvizError::Annotation(format!("invalid score `{raw}`"))
                })?),
            },
            strand: Strand::parse(strand)?,
            frame: match *frame {
                "." => None,
                raw => Some(raw.parse().map_err(|_| {
                    GvizError::Annotation(format!("invalid frame `{raw}`"))
                })?),
            },
            attributes: parse_attributes(attributes),
        })
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Overlap test against a 1-based inclusive region.
    #[must_use]
    pub fn overlaps(&self, seqname: &str, start: u64, end: u64) -> bool {
        self.seqname == seqname && self.start <= end && self.end >= start
    }
}

fn parse_position(raw: &str, field: &str) -> GvizResult<u64> {
    match raw.parse::<u64>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(GvizError::Annotation(format!(
            "invalid {field} position `{raw}`"
        ))),
    }
}

/// `key "value"; key value;` pairs. Repeated keys (e.g. `tag`) keep the first value.
fn parse_attributes(raw: &str) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    for entry in raw.split(';') {
        let entry = entry.trim();
        let Some((key, value)) = entry.split_once(char::is_whitespace) else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        attributes
            .entry(key.to_owned())
            .or_insert_with(|| value.to_owned());
    }
    attributes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    pub start: u64,
    pub end: u64,
}

/// Gene model assembled from the records sharing a `gene_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub name: Option<String>,
    pub gene_type: Option<String>,
    pub seqname: String,
    pub strand: Strand,
    pub start: u64,
    pub end: u64,
    pub exons: SmallVec<[Exon; 8]>,
}

impl Gene {
    #[must_use]
    pub fn new(id: impl Into<String>, seqname: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            id: id.into(),
            name: None,
            gene_type: None,
            seqname: seqname.into(),
            strand: Strand::Unknown,
            start: start.min(end),
            end: start.max(end),
            exons: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    #[must_use]
    pub fn with_exon(mut self, start: u64, end: u64) -> Self {
        self.exons.push(Exon {
            start: start.min(end),
            end: start.max(end),
        });
        merge_exons(&mut self.exons);
        self
    }

    /// Display label: the gene name when known, else its id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Default)]
struct GeneBuilder {
    seqname: String,
    name: Option<String>,
    gene_type: Option<String>,
    strand: Strand,
    declared: Option<(u64, u64)>,
    observed: Option<(u64, u64)>,
    exons: SmallVec<[Exon; 8]>,
}

/// Groups records by `gene_id` into gene models ordered by start.
///
/// The extent comes from the `gene` feature when present and from the union of
/// the gene's other features otherwise. Overlapping exons (from different
/// transcripts) are merged.
#[must_use]
pub fn genes_from_records<I: IntoIterator<Item = GtfRecord>>(records: I) -> Vec<Gene> {
    let mut builders: IndexMap<String, GeneBuilder> = IndexMap::new();

    for record in records {
        let Some(gene_id) = record.attribute("gene_id").map(str::to_owned) else {
            warn!(
                feature = %record.feature,
                start = record.start,
                "skipping gtf record without gene_id"
            );
            continue;
        };

        let builder = builders.entry(gene_id).or_default();
        if builder.seqname.is_empty() {
            builder.seqname.clone_from(&record.seqname);
        }
        if builder.name.is_none() {
            builder.name = record.attribute("gene_name").map(str::to_owned);
        }
        if builder.gene_type.is_none() {
            builder.gene_type = record
                .attribute("gene_type")
                .or_else(|| record.attribute("gene_biotype"))
                .map(str::to_owned);
        }
        if builder.strand == Strand::Unknown {
            builder.strand = record.strand;
        }

        match record.feature.as_str() {
            "gene" => builder.declared = Some((record.start, record.end)),
            "exon" => {
                builder.exons.push(Exon {
                    start: record.start,
                    end: record.end,
                });
                widen(&mut builder.observed, record.start, record.end);
            }
            _ => widen(&mut builder.observed, record.start, record.end),
        }
    }

    let mut genes: Vec<Gene> = builders
        .into_iter()
        .filter_map(|(id, mut builder)| {
            let (start, end) = builder.declared.or(builder.observed)?;
            merge_exons(&mut builder.exons);
            Some(Gene {
                id,
                name: builder.name,
                gene_type: builder.gene_type,
                seqname: builder.seqname,
                strand: builder.strand,
                start,
                end,
                exons: builder.exons,
            })
        })
        .collect();

    genes.sort_by(|left, right| {
        left.start
            .cmp(&right.start)
            .then(left.end.cmp(&right.end))
            .then_with(|| left.id.cmp(&right.id))
    });
    genes
}

fn widen(extent: &mut Option<(u64, u64)>, start: u64, end: u64) {
    *extent = Some(match *extent {
        Some((low, high)) => (low.min(start), high.max(end)),
        None => (start, end),
    });
}

fn merge_exons(exons: &mut SmallVec<[Exon; 8]>) {
    exons.sort_by_key(|exon| (exon.start, exon.end));
    let mut merged: SmallVec<[Exon; 8]> = SmallVec::with_capacity(exons.len());
    for exon in exons.drain(..) {
        match merged.last_mut() {
            Some(last) if exon.start <= last.end.saturating_add(1) => {
                last.end = last.end.max(exon.end);
            }
            _ => merged.push(exon),
        }
    }
    *exons = merged;
}

#[cfg(test)]
mod tests {
    use super::{Exon, Gene, GtfRecord, Strand, genes_from_records};

    const GENE_LINE: &str = "chr20\tHAVANA\tgene\t31400100\t31420000\t.\t+\t.\t\
        gene_id \"ENSG01\"; gene_type \"protein_coding\"; gene_name \"DNMT3B\";";

    fn exon(start: u64, end: u64, transcript: &str) -> GtfRecord {
        GtfRecord::parse_line(&format!(
            "chr20\tHAVANA\texon\t{start}\t{end}\t.\t+\t.\t\
             gene_id \"ENSG01\"; transcript_id \"{transcript}\"; gene_name \"DNMT3B\";"
        ))
        .expect("exon line")
    }

    #[test]
    fn parses_columns_and_attributes() {
        let record = GtfRecord::parse_line(GENE_LINE).expect("gene line");
        assert_eq!(record.seqname, "chr20");
        assert_eq!(record.feature, "gene");
        assert_eq!((record.start, record.end), (31_400_100, 31_420_000));
        assert_eq!(record.strand, Strand::Forward);
        assert_eq!(record.score, None);
        assert_eq!(record.attribute("gene_name"), Some("DNMT3B"));
        assert_eq!(record.attribute("gene_type"), Some("protein_coding"));
        assert!(record.overlaps("chr20", 31_419_000, 31_500_000));
        assert!(!record.overlaps("chr21", 31_419_000, 31_500_000));
    }

    #[test]
    fn rejects_short_lines_and_bad_positions() {
        assert!(GtfRecord::parse_line("chr1\tsrc\tgene\t1\t10").is_err());
        assert!(GtfRecord::parse_line("chr1\tsrc\tgene\t0\t10\t.\t+\t.\tgene_id \"a\";").is_err());
        assert!(GtfRecord::parse_line("chr1\tsrc\tgene\t20\t10\t.\t+\t.\tgene_id \"a\";").is_err());
        assert!(GtfRecord::parse_line("chr1\tsrc\tgene\t1\t10\t.\t*\t.\tgene_id \"a\";").is_err());
    }

    #[test]
    fn genes_merge_overlapping_exons_across_transcripts() {
        let records = vec![
            GtfRecord::parse_line(GENE_LINE).expect("gene"),
            exon(31_400_100, 31_400_500, "T1"),
            exon(31_400_300, 31_400_800, "T2"),
            exon(31_410_000, 31_410_200, "T1"),
        ];

        let genes = genes_from_records(records);
        assert_eq!(genes.len(), 1);
        let gene = &genes[0];
        assert_eq!(gene.label(), "DNMT3B");
        assert_eq!((gene.start, gene.end), (31_400_100, 31_420_000));
        assert_eq!(
            gene.exons.as_slice(),
            &[
                Exon {
                    start: 31_400_100,
                    end: 31_400_800
                },
                Exon {
                    start: 31_410_000,
                    end: 31_410_200
                },
            ]
        );
    }

    #[test]
    fn gene_extent_falls_back_to_features_without_gene_line() {
        let genes = genes_from_records(vec![
            exon(500, 600, "T1"),
            exon(100, 200, "T1"),
        ]);
        assert_eq!((genes[0].start, genes[0].end), (100, 600));
    }

    #[test]
    fn builder_label_falls_back_to_id() {
        let gene = Gene::new("ENSG02", "chr1", 50, 10).with_exon(10, 20);
        assert_eq!(gene.label(), "ENSG02");
        assert_eq!((gene.start, gene.end), (10, 50));
    }
}
