use crate::error::Result;
use crate::io::{read_transcripts, GffWriter};
use crate::transcript::sort_transcripts;
use std::io::{BufRead, Write};
use tracing::info;

/// Sort a GFF file by chromosome, start and span so it can feed the
/// cluster pipeline. Returns the number of transcripts written.
pub fn run_sort<R: BufRead, W: Write>(input: R, output: W) -> Result<usize> {
    let mut transcripts = read_transcripts(input)?;
    sort_transcripts(&mut transcripts);
    info!("Sorted {} transcripts", transcripts.len());

    let mut writer = GffWriter::new(output);
    writer.write_transcripts(&transcripts)?;
    writer.flush()?;

    Ok(transcripts.len())
}
