//! GFF2 transcript records
//!
//! A transcript is an `mRNA` (or `transcript`) line followed by its `exon`
//! lines. File coordinates are 1-based and inclusive; in memory they are
//! 0-based and half-open. The score column carries the transcript size and
//! `gene_id` carries the group identifier.

use crate::error::{ClusterError, Result};
use crate::transcript::{Exon, Strand, Transcript};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};

const SOURCE: &str = "isoclust";

/// Open a GFF file for reading. `None` or `-` reads standard input and
/// paths ending in `.gz` are decompressed on the fly.
pub fn open_gff(path: Option<&str>) -> Result<Box<dyn BufRead + Send>> {
    match path {
        None | Some("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) => {
            let file = File::open(p)?;
            if p.ends_with(".gz") {
                Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
            } else {
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// Create the output sink. `None` or `-` writes to standard output.
pub fn create_output(path: Option<&str>) -> Result<Box<dyn Write + Send>> {
    match path {
        None | Some("-") => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
    }
}

/// Look up an attribute value in a GFF2/GTF (`key "value";`) or
/// GFF3 (`key=value;`) attribute column
pub fn attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    for part in attributes.split(';') {
        let part = part.trim();
        let Some((k, v)) = part.split_once(|c: char| c == ' ' || c == '=') else {
            continue;
        };
        if k == key {
            return Some(v.trim().trim_matches('"'));
        }
    }
    None
}

struct Record<'a> {
    chrom: &'a str,
    feature: &'a str,
    start: i64,
    end: i64,
    score: &'a str,
    strand: &'a str,
    attributes: &'a str,
}

fn parse_record(line: &str, line_no: usize) -> Result<Record<'_>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(ClusterError::Parse {
            line: line_no,
            reason: format!("expected 9 tab-separated columns, found {}", fields.len()),
        });
    }

    let coordinate = |s: &str| {
        s.trim().parse::<i64>().map_err(|_| ClusterError::Parse {
            line: line_no,
            reason: format!("invalid coordinate '{}'", s),
        })
    };
    let start = coordinate(fields[3])?;
    let end = coordinate(fields[4])?;
    if start < 1 || end < start {
        return Err(ClusterError::Parse {
            line: line_no,
            reason: format!("invalid interval {}..{}", start, end),
        });
    }

    Ok(Record {
        chrom: fields[0],
        feature: fields[2],
        start,
        end,
        score: fields[5],
        strand: fields[6],
        attributes: fields[8],
    })
}

fn parse_size(score: &str, line_no: usize) -> Result<usize> {
    let score = score.trim();
    if score == "." || score.is_empty() {
        return Ok(1);
    }
    match score.parse::<f64>() {
        Ok(v) if v >= 0.0 => Ok(v.round() as usize),
        _ => Err(ClusterError::Parse {
            line: line_no,
            reason: format!("invalid score '{}'", score),
        }),
    }
}

fn transcript_id(record: &Record, line_no: usize) -> Result<String> {
    attribute(record.attributes, "transcript_id")
        .map(str::to_string)
        .ok_or_else(|| ClusterError::Parse {
            line: line_no,
            reason: "missing transcript_id attribute".to_string(),
        })
}

/// Transcript being assembled from its feature lines
struct Pending {
    transcript: Transcript,
    exons: Vec<Exon>,
}

impl Pending {
    fn finish(mut self) -> Result<Transcript> {
        if self.exons.is_empty() {
            return Err(ClusterError::NoExons(self.transcript.id));
        }
        self.transcript.set_exons(self.exons);
        Ok(self.transcript)
    }
}

/// Streaming reader yielding one transcript per `mRNA` record
pub struct GffTranscriptReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
    current: Option<Pending>,
    done: bool,
}

impl<R: BufRead> GffTranscriptReader<R> {
    pub fn new(reader: R) -> Self {
        GffTranscriptReader {
            lines: reader.lines(),
            line_no: 0,
            current: None,
            done: false,
        }
    }

    fn fail(&mut self, err: ClusterError) -> Option<Result<Transcript>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for GffTranscriptReader<R> {
    type Item = Result<Transcript>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return self.fail(e.into()),
                None => {
                    self.done = true;
                    return self.current.take().map(Pending::finish);
                }
            };
            self.line_no += 1;
            let line_no = self.line_no;

            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let record = match parse_record(trimmed, line_no) {
                Ok(r) => r,
                Err(e) => return self.fail(e),
            };

            match record.feature {
                "mRNA" | "transcript" => {
                    let id = match transcript_id(&record, line_no) {
                        Ok(id) => id,
                        Err(e) => return self.fail(e),
                    };
                    let size = match parse_size(record.score, line_no) {
                        Ok(s) => s,
                        Err(e) => return self.fail(e),
                    };

                    let mut transcript = Transcript::new(
                        id,
                        record.chrom,
                        record.start - 1,
                        Strand::from_symbol(record.strand.trim()),
                        Vec::new(),
                    )
                    .with_size(size);
                    transcript.group_id = attribute(record.attributes, "gene_id").map(str::to_string);

                    let previous = self.current.replace(Pending { transcript, exons: Vec::new() });
                    if let Some(previous) = previous {
                        let finished = previous.finish();
                        if finished.is_err() {
                            self.done = true;
                        }
                        return Some(finished);
                    }
                }
                "exon" => {
                    let exon_id = match transcript_id(&record, line_no) {
                        Ok(id) => id,
                        Err(e) => return self.fail(e),
                    };
                    let Some(pending) = self.current.as_mut() else {
                        return self.fail(ClusterError::OrphanExon { line: line_no });
                    };
                    if exon_id != pending.transcript.id {
                        let current = pending.transcript.id.clone();
                        return self.fail(ClusterError::ExonMismatch {
                            line: line_no,
                            exon_transcript: exon_id,
                            current,
                        });
                    }

                    let start = record.start - 1;
                    pending
                        .exons
                        .push(Exon::new(start - pending.transcript.start, record.end - start));
                }
                _ => continue,
            }
        }
    }
}

/// Read every transcript from a GFF source
pub fn read_transcripts<R: BufRead>(reader: R) -> Result<Vec<Transcript>> {
    GffTranscriptReader::new(reader).collect()
}

/// Writer emitting one `mRNA` line per transcript followed by its exons
pub struct GffWriter<W: Write> {
    writer: W,
}

impl<W: Write> GffWriter<W> {
    pub fn new(writer: W) -> Self {
        GffWriter { writer }
    }

    pub fn write_transcript(&mut self, tr: &Transcript) -> io::Result<()> {
        let group = tr.group_id.as_deref().unwrap_or(&tr.id);

        writeln!(
            self.writer,
            "{}\t{}\tmRNA\t{}\t{}\t{}\t{}\t.\tgene_id \"{}\"; transcript_id \"{}\";",
            tr.chrom,
            SOURCE,
            tr.start + 1,
            tr.end(),
            tr.size,
            tr.strand,
            group,
            tr.id
        )?;

        for i in 0..tr.exon_count() {
            writeln!(
                self.writer,
                "{}\t{}\texon\t{}\t{}\t{}\t{}\t.\ttranscript_id \"{}\"; exon_number \"{}\";",
                tr.chrom,
                SOURCE,
                tr.exon_start(i) + 1,
                tr.exon_end(i),
                tr.size,
                tr.strand,
                tr.id,
                i + 1
            )?;
        }

        Ok(())
    }

    pub fn write_transcripts<'a, I>(&mut self, transcripts: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a Transcript>,
    {
        for tr in transcripts {
            self.write_transcript(tr)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "##gff-version 2\n\
chr1\tminimap2\tmRNA\t101\t600\t4\t+\t.\tgene_id \"g1\"; transcript_id \"t1\";\n\
chr1\tminimap2\texon\t101\t200\t4\t+\t.\ttranscript_id \"t1\";\n\
chr1\tminimap2\texon\t501\t600\t4\t+\t.\ttranscript_id \"t1\";\n\
chr1\tminimap2\tgene\t101\t600\t.\t+\t.\tgene_id \"g1\";\n\
\n\
chr2\tminimap2\tmRNA\t11\t50\t.\t-\t.\ttranscript_id \"t2\";\n\
chr2\tminimap2\texon\t11\t50\t.\t-\t.\ttranscript_id \"t2\";\n";

    #[test]
    fn test_attribute_lookup() {
        let attrs = "gene_id \"g1\"; transcript_id \"t1\";";
        assert_eq!(attribute(attrs, "gene_id"), Some("g1"));
        assert_eq!(attribute(attrs, "transcript_id"), Some("t1"));
        assert_eq!(attribute(attrs, "exon_id"), None);
        assert_eq!(attribute("ID=t9;Parent=g9", "Parent"), Some("g9"));
    }

    #[test]
    fn test_read_transcripts() {
        let trs = read_transcripts(SAMPLE.as_bytes()).unwrap();
        assert_eq!(trs.len(), 2);

        let t1 = &trs[0];
        assert_eq!(t1.id, "t1");
        assert_eq!(t1.chrom, "chr1");
        assert_eq!(t1.start, 100);
        assert_eq!(t1.end(), 600);
        assert_eq!(t1.exon_count(), 2);
        assert_eq!(t1.exon_start(1), 500);
        assert_eq!(t1.size, 4);
        assert_eq!(t1.group_id.as_deref(), Some("g1"));
        assert_eq!(t1.strand, Strand::Forward);

        let t2 = &trs[1];
        assert_eq!(t2.strand, Strand::Reverse);
        assert_eq!(t2.size, 1);
        assert!(t2.group_id.is_none());
    }

    #[test]
    fn test_exon_mismatch() {
        let data = "chr1\tx\tmRNA\t1\t10\t.\t+\t.\ttranscript_id \"a\";\n\
chr1\tx\texon\t1\t10\t.\t+\t.\ttranscript_id \"b\";\n";
        let err = read_transcripts(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ClusterError::ExonMismatch { line: 2, .. }));
    }

    #[test]
    fn test_orphan_exon_and_missing_exons() {
        let data = "chr1\tx\texon\t1\t10\t.\t+\t.\ttranscript_id \"b\";\n";
        let err = read_transcripts(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ClusterError::OrphanExon { line: 1 }));

        let data = "chr1\tx\tmRNA\t1\t10\t.\t+\t.\ttranscript_id \"a\";\n";
        let err = read_transcripts(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ClusterError::NoExons(ref id) if id == "a"));
    }

    #[test]
    fn test_malformed_line() {
        let data = "chr1\tx\tmRNA\tten\t10\t.\t+\t.\ttranscript_id \"a\";\n";
        let err = read_transcripts(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ClusterError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_write_transcript() {
        let tr = Transcript::from_intervals("cluster_1", "chr1", Strand::Reverse, &[(100, 200), (500, 600)])
            .with_group("group_1")
            .with_size(7);

        let mut writer = GffWriter::new(Vec::new());
        writer.write_transcript(&tr).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "chr1\tisoclust\tmRNA\t101\t600\t7\t-\t.\tgene_id \"group_1\"; transcript_id \"cluster_1\";"
        );
        assert!(lines[2].starts_with("chr1\tisoclust\texon\t501\t600\t7\t-"));
    }
}
