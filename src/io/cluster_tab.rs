use crate::cluster::TranscriptCluster;
use std::fs::File;
use std::io::{BufWriter, Result, Write};

/// Tab-separated cluster membership table (`Read\tCluster`)
pub struct ClusterTabWriter<W: Write> {
    writer: W,
}

/// Create the table at `path` and write its header
pub fn create_cluster_tab(path: &str) -> Result<ClusterTabWriter<BufWriter<File>>> {
    ClusterTabWriter::new(BufWriter::new(File::create(path)?))
}

impl<W: Write> ClusterTabWriter<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "Read\tCluster")?;
        Ok(ClusterTabWriter { writer })
    }

    /// One line per member transcript
    pub fn write_cluster(&mut self, cluster: &TranscriptCluster) -> Result<()> {
        for tr in &cluster.transcripts {
            writeln!(self.writer, "{}\t{}", tr.id, cluster.id)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
