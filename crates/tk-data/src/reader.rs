//! Container readers: named numeric arrays from MAT and CSV files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use matfile::{MatFile, NumericData};
use tracing::debug;

use crate::error::{DataError, DataResult};

/// Header text written by MATLAB for HDF5-based (v7.3) MAT files.
const MAT73_SIGNATURE: &[u8] = b"MATLAB 7.3 MAT-file";
/// Header text common to every MAT file.
const MAT_SIGNATURE: &[u8] = b"MATLAB";

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Legacy binary MAT file (level 5).
    MatV5,
    /// MAT v7.3, an HDF5 container.
    MatV73,
    /// Delimited text with a header row.
    Csv,
}

impl FileFormat {
    pub fn label(self) -> &'static str {
        match self {
            FileFormat::MatV5 => "MAT v5",
            FileFormat::MatV73 => "MAT v7.3",
            FileFormat::Csv => "CSV",
        }
    }

    /// Detect the format from the file header, falling back to the extension.
    pub fn detect(path: &Path) -> DataResult<Self> {
        let mut header = [0u8; 128];
        let read = File::open(path)
            .and_then(|mut f| f.read(&mut header))
            .map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let header = &header[..read];

        if header.starts_with(MAT73_SIGNATURE) {
            return Ok(FileFormat::MatV73);
        }
        if header.starts_with(MAT_SIGNATURE) {
            return Ok(FileFormat::MatV5);
        }
        // HDF5 superblock signature at offset 0 (a bare .h5 export).
        if header.starts_with(b"\x89HDF\r\n\x1a\n") {
            return Ok(FileFormat::MatV73);
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("mat") => Ok(FileFormat::MatV5),
            Some("h5") | Some("hdf5") => Ok(FileFormat::MatV73),
            _ => Ok(FileFormat::Csv),
        }
    }
}

/// Named one-dimensional numeric arrays, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayContainer {
    entries: Vec<(String, Vec<f64>)>,
}

impl ArrayContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an array, replacing any existing array with the same key.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<f64>) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = values;
        } else {
            self.entries.push((key, values));
        }
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read every numeric array from a supported container.
pub fn read_container(path: &Path) -> DataResult<ArrayContainer> {
    let format = FileFormat::detect(path)?;
    debug!(path = %path.display(), format = format.label(), "reading container");
    match format {
        FileFormat::MatV5 => read_mat_v5(path),
        FileFormat::MatV73 => read_mat_v73(path),
        FileFormat::Csv => read_csv(path),
    }
}

fn read_mat_v5(path: &Path) -> DataResult<ArrayContainer> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mat = MatFile::parse(file).map_err(|e| DataError::Format {
        format: FileFormat::MatV5.label(),
        path: path.to_path_buf(),
        message: format!("{e:?}"),
    })?;

    let mut container = ArrayContainer::new();
    for array in mat.arrays() {
        // Column-major storage: flattening keeps a row or column vector in order.
        container.insert(array.name(), numeric_to_f64(array.data()));
    }
    Ok(container)
}

/// Widen the real part of any numeric class to `f64`.
fn numeric_to_f64(data: &NumericData) -> Vec<f64> {
    match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
    }
}

#[cfg(feature = "hdf5")]
fn read_mat_v73(path: &Path) -> DataResult<ArrayContainer> {
    let format_err = |e: hdf5::Error| DataError::Format {
        format: FileFormat::MatV73.label(),
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let file = hdf5::File::open(path).map_err(format_err)?;
    let mut container = ArrayContainer::new();
    collect_hdf5_group(&file, "", &mut container).map_err(format_err)?;
    Ok(container)
}

#[cfg(feature = "hdf5")]
fn collect_hdf5_group(
    group: &hdf5::Group,
    prefix: &str,
    container: &mut ArrayContainer,
) -> hdf5::Result<()> {
    for name in group.member_names()? {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        if let Ok(ds) = group.dataset(&name) {
            // Non-numeric datasets (MATLAB cell/char metadata) are skipped.
            if let Ok(values) = ds.read_raw::<f64>() {
                container.insert(key, values);
            }
        } else if let Ok(child) = group.group(&name) {
            collect_hdf5_group(&child, &key, container)?;
        }
    }
    Ok(())
}

#[cfg(not(feature = "hdf5"))]
fn read_mat_v73(path: &Path) -> DataResult<ArrayContainer> {
    Err(DataError::UnsupportedFormat {
        path: path.to_path_buf(),
        what: "MAT v7.3 (HDF5) files need a build with `--features hdf5`; re-save as MAT v5 (`save -v7`) or CSV otherwise",
    })
}

fn read_csv(path: &Path) -> DataResult<ArrayContainer> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&text).map_err(|e| DataError::Format {
        format: FileFormat::Csv.label(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse delimited text with a header row into named columns.
///
/// The delimiter is `;` when the header contains semicolons but no commas,
/// otherwise `,`. Unparseable cells become NaN and are dropped during cleaning.
pub fn parse_csv(text: &str) -> Result<ArrayContainer, csv::Error> {
    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = if header_line.contains(';') && !header_line.contains(',') {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, values) in columns.iter_mut().enumerate() {
            let v = record
                .get(col)
                .and_then(|cell| cell.parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            values.push(v);
        }
    }

    let mut container = ArrayContainer::new();
    for (name, values) in headers.into_iter().zip(columns) {
        container.insert(name, values);
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn container_preserves_insertion_order() {
        let mut c = ArrayContainer::new();
        c.insert("b", vec![1.0]);
        c.insert("a", vec![2.0]);
        c.insert("b", vec![3.0]);
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(c.get("b"), Some(&[3.0][..]));
    }

    #[test]
    fn parse_csv_comma() {
        let c = parse_csv("time, input, output\n0, 0, 0.1\n1, 1, 0.5\n").unwrap();
        assert_eq!(c.get("time"), Some(&[0.0, 1.0][..]));
        assert_eq!(c.get("output"), Some(&[0.1, 0.5][..]));
    }

    #[test]
    fn parse_csv_semicolon_and_bad_cells() {
        let c = parse_csv("t;u;y\n0;0;x\n1;1;2\n").unwrap();
        let y = c.get("y").unwrap();
        assert!(y[0].is_nan());
        assert_eq!(y[1], 2.0);
    }

    #[test]
    fn detect_mat_headers() {
        let dir = tempfile::tempdir().unwrap();

        let v73 = dir.path().join("new.mat");
        let mut f = File::create(&v73).unwrap();
        f.write_all(b"MATLAB 7.3 MAT-file, Platform: GLNXA64").unwrap();
        assert_eq!(FileFormat::detect(&v73).unwrap(), FileFormat::MatV73);

        let v5 = dir.path().join("old.dat");
        let mut f = File::create(&v5).unwrap();
        f.write_all(b"MATLAB 5.0 MAT-file, Platform: PCWIN64").unwrap();
        assert_eq!(FileFormat::detect(&v5).unwrap(), FileFormat::MatV5);

        let csv = dir.path().join("bench.csv");
        std::fs::write(&csv, "t,u,y\n").unwrap();
        assert_eq!(FileFormat::detect(&csv).unwrap(), FileFormat::Csv);
    }

    #[test]
    fn corrupt_mat_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mat");
        std::fs::write(&path, b"MATLAB 5.0 MAT-file truncated").unwrap();
        assert!(matches!(
            read_container(&path),
            Err(DataError::Format { .. })
        ));
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn mat73_without_feature_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.mat");
        std::fs::write(&path, b"MATLAB 7.3 MAT-file").unwrap();
        match read_container(&path) {
            Err(e @ DataError::UnsupportedFormat { .. }) => {
                assert!(e.to_string().contains("--features hdf5"));
            }
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }
}
