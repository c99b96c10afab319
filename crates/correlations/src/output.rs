use crate::offsets::DistanceSortedSeries;
use crate::radial::RadialCorrelationProfile;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub fn write_series_csv<W: Write>(mut w: W, series: &DistanceSortedSeries) -> io::Result<()> {
    writeln!(w, "label,distance,value")?;
    for (label, distance, value) in series.rows() {
        writeln!(w, "\"{}\",{},{}", label, distance, value)?;
    }
    Ok(())
}

pub fn write_profile_csv<W: Write>(mut w: W, profile: &RadialCorrelationProfile) -> io::Result<()> {
    writeln!(w, "distance,value,count")?;
    for s in &profile.shells {
        writeln!(w, "{},{},{}", s.distance, s.mean, s.count)?;
    }
    Ok(())
}

pub fn write_json<W: Write, T: Serialize>(mut w: W, value: &T) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut w, value)?;
    writeln!(w).map_err(serde_json::Error::io)
}

/// Creates `path` and hands a buffered writer to `write`.
pub fn to_file<F, E>(path: &str, write: F) -> Result<(), E>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), E>,
    E: From<io::Error>,
{
    let mut w = BufWriter::new(File::create(path)?);
    write(&mut w)?;
    w.flush()?;
    Ok(())
}
