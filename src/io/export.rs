use anyhow::Result;
use std::io::Write;

use crate::domain::Ballot;

/// Exporter for rendering a ballot in interchange formats
pub struct Exporter<'a> {
    ballot: &'a Ballot,
}

impl<'a> Exporter<'a> {
    pub fn new(ballot: &'a Ballot) -> Self {
        Self { ballot }
    }

    /// Export votes to CSV format
    pub fn export_votes_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["id", "title", "age", "completed"])?;

        let mut count = 0;
        for vote in self.ballot.votes() {
            csv_writer.write_record(&[
                vote.id.to_string(),
                vote.title.clone(),
                vote.age.to_string(),
                vote.completed.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export votes as a pretty-printed JSON array
    pub fn export_votes_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let json = serde_json::to_string_pretty(self.ballot.votes())?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(self.ballot.len())
    }
}
