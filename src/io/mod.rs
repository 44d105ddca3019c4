use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use log::{debug, info};
use crate::distribution::DistributionSample;
use crate::error::{CalcError, CalcResult};

/// Reads headed CSV rows (`size,percent` or `time,percent`).
pub fn read_rows_from_reader<T: DeserializeOwned, R: Read>(reader: R) -> CalcResult<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record.map_err(|err| row_error(err, &headers))?);
    }
    debug!("Read {} rows", rows.len());
    Ok(rows)
}

/// Unparseable cells are bad input, not I/O failures.
fn row_error(err: csv::Error, headers: &csv::StringRecord) -> CalcError {
    let detail = match err.kind() {
        csv::ErrorKind::Deserialize { pos, err: cell } => {
            let column = cell
                .field()
                .and_then(|i| headers.get(i as usize))
                .unwrap_or("?");
            let line = pos.as_ref().map_or(0, |p| p.line());
            Some(format!("Invalid value in column '{}' on line {}: {}", column, line, cell.kind()))
        }
        _ => None,
    };
    match detail {
        Some(message) => CalcError::Validation(message),
        None => CalcError::from(err),
    }
}

pub fn read_rows<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> CalcResult<Vec<T>> {
    let file = File::open(path.as_ref())?;
    let rows = read_rows_from_reader(file)?;
    if rows.is_empty() {
        return Err(CalcError::Validation(format!(
            "No data rows found in {}",
            path.as_ref().display()
        )));
    }
    Ok(rows)
}

#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a, T: Serialize> {
    pub tool: &'a str,
    pub generated_at: DateTime<Utc>,
    pub report: &'a T,
}

pub fn write_report<T: Serialize, W: Write>(tool: &str, report: &T, writer: W) -> CalcResult<()> {
    let envelope = ReportEnvelope {
        tool,
        generated_at: Utc::now(),
        report,
    };
    serde_json::to_writer_pretty(writer, &envelope)?;
    Ok(())
}

pub fn save_report<T: Serialize, P: AsRef<Path>>(tool: &str, report: &T, path: P) -> CalcResult<()> {
    let file = File::create(path.as_ref())?;
    write_report(tool, report, file)?;
    info!("Report saved to {:?}", path.as_ref());
    Ok(())
}

/// Writes a cumulative curve as CSV with the given independent-variable header.
pub fn write_curve<W: Write>(samples: &[DistributionSample], x_header: &str, writer: W) -> CalcResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([x_header, "CUMULATIVE_PERCENT"])?;
    for sample in samples {
        wtr.write_record(&[sample.x.to_string(), sample.percent.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_curve<P: AsRef<Path>>(samples: &[DistributionSample], x_header: &str, path: P) -> CalcResult<()> {
    let file = File::create(path.as_ref())?;
    write_curve(samples, x_header, file)?;
    info!("Curve saved to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{ProfilePoint, SieveRow};

    #[test]
    fn test_read_sieve_rows() {
        let data = "size, percent\n# coarsest first\n500,10\n250,30\n125, 40\n0,20\n";
        let rows: Vec<SieveRow> = read_rows_from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], SieveRow { size: 125.0, percent: 40.0 });
    }

    #[test]
    fn test_non_numeric_cell_is_a_validation_error() {
        let data = "time,percent\n0,0\n5,abc\n";
        let result: CalcResult<Vec<ProfilePoint>> = read_rows_from_reader(data.as_bytes());
        match result {
            Err(CalcError::Validation(msg)) => {
                assert!(msg.contains("column 'percent'"), "{}", msg);
                assert!(msg.contains("line 3"), "{}", msg);
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_report_envelope() {
        let mut buffer = Vec::new();
        let report = ProfilePoint { time: 10.0, percent: 25.0 };
        write_report("dissolution", &report, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["tool"], "dissolution");
        assert_eq!(value["report"]["percent"], 25.0);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_curve() {
        let mut buffer = Vec::new();
        let samples = [DistributionSample::new(0.0, 0.0), DistributionSample::new(125.0, 20.0)];
        write_curve(&samples, "SIZE_UM", &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "SIZE_UM,CUMULATIVE_PERCENT\n0,0\n125,20\n");
    }
}
