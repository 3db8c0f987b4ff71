//! Transparent decompression of dependency exports.

use std::io::{self, Read};
use std::path::Path;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_from_path() {
        assert_eq!(Compression::from_path(Path::new("deps.csv")), Compression::None);
        assert_eq!(Compression::from_path(Path::new("deps.csv.gz")), Compression::Gzip);
        assert_eq!(Compression::from_path(Path::new("deps.csv.BZ2")), Compression::Bzip2);
        assert_eq!(Compression::from_path(Path::new("deps.csv.xz")), Compression::Xz);
        assert_eq!(Compression::from_path(Path::new("deps.csv.zst")), Compression::Zstd);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Compression::from_path(Path::new("deps.csv.gz")).to_string(), "gzip");
        assert_eq!(Compression::Zstd.to_string(), "zstd");
        assert_eq!(Compression::None.to_string(), "none");
    }

    #[test]
    fn test_gzip_round_trip_through_reader() {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"CLUSTER,SCHEMA\n").unwrap();
        let bytes = encoder.finish().unwrap();

        let mut reader = Compression::Gzip
            .wrap_reader(Box::new(std::io::Cursor::new(bytes)))
            .unwrap();
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "CLUSTER,SCHEMA\n");
    }
}
