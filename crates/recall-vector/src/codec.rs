//! On-disk format for flat vector indexes.
//!
//! Layout, all multi-byte values little-endian:
//!
//! ```text
//! [4B magic "RVEC"] [4B version=1]
//! [4B dim] [4B count]
//! [count x dim x 4B float32 vector data]
//! ```
//!
//! `dim = 0` encodes an index whose dimension was never fixed (no vectors
//! inserted). Saves go to a temp sibling which is renamed over the target,
//! so a prior file is never left half-written.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::flat::FlatIndex;

const MAGIC: [u8; 4] = *b"RVEC";
const VERSION: u32 = 1;

/// Serialize a flat index to `path`, atomically replacing any prior file.
pub fn save(index: &FlatIndex, path: &Path) -> Result<(), StoreError> {
    let tmp = tmp_path(path);
    write_to(index, &tmp)?;
    std::fs::rename(&tmp, path)?;

    debug!(path = ?path, vectors = index.len(), "Saved vector index");
    Ok(())
}

fn write_to(index: &FlatIndex, path: &Path) -> Result<(), StoreError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(&MAGIC)?;
    w.write_all(&VERSION.to_le_bytes())?;

    let dim = index.dimension().unwrap_or(0) as u32;
    let count = index.len() as u32;
    w.write_all(&dim.to_le_bytes())?;
    w.write_all(&count.to_le_bytes())?;

    for value in index.data() {
        w.write_all(&value.to_le_bytes())?;
    }

    w.flush()?;
    Ok(())
}

/// Deserialize a flat index from `path`.
pub fn load(path: &Path) -> Result<FlatIndex, StoreError> {
    let file = File::open(path)?;
    let mut r = BufReader::new(file);

    let mut magic = [0u8; 4];
    read_exact(&mut r, &mut magic)?;
    if magic != MAGIC {
        return Err(StoreError::Codec(format!(
            "bad magic {:?} in {}",
            magic,
            path.display()
        )));
    }

    let version = read_u32(&mut r)?;
    if version != VERSION {
        return Err(StoreError::Codec(format!(
            "unsupported version {} in {}",
            version,
            path.display()
        )));
    }

    let dim = read_u32(&mut r)? as usize;
    let count = read_u32(&mut r)? as usize;

    let mut data = vec![0f32; dim * count];
    let mut buf = [0u8; 4];
    for value in data.iter_mut() {
        read_exact(&mut r, &mut buf)?;
        *value = f32::from_le_bytes(buf);
    }

    let dimension = if dim == 0 { None } else { Some(dim) };
    let index = FlatIndex::from_raw(dimension, data)?;

    debug!(path = ?path, vectors = index.len(), "Loaded vector index");
    Ok(index)
}

fn read_u32(r: &mut impl Read) -> Result<u32, StoreError> {
    let mut buf = [0u8; 4];
    read_exact(r, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_exact(r: &mut impl Read, buf: &mut [u8]) -> Result<(), StoreError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            StoreError::Codec("truncated vector file".to_string())
        } else {
            StoreError::Io(e)
        }
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_embeddings::Embedding;

    fn sample_index() -> FlatIndex {
        let mut index = FlatIndex::new();
        index
            .add_batch(&[
                Embedding::new(vec![1.0, 2.0, 3.0]),
                Embedding::new(vec![-4.0, 5.5, 0.25]),
            ])
            .unwrap();
        index
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");

        let index = sample_index();
        save(&index, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_save_empty_index() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("empty.vec");

        save(&FlatIndex::new(), &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.dimension(), None);
        assert_eq!(loaded.len(), 0);
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");

        save(&sample_index(), &path).unwrap();

        let mut small = FlatIndex::new();
        small.add_batch(&[Embedding::new(vec![9.0])]).unwrap();
        save(&small, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.dimension(), Some(1));
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_no_tmp_residue() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");
        save(&sample_index(), &path).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("docs.vec")]);
    }

    #[test]
    fn test_round_trip_random_vectors() {
        use rand::Rng;
        let mut rng = rand::rng();

        let mut index = FlatIndex::new();
        let vectors: Vec<Embedding> = (0..20)
            .map(|_| Embedding::new((0..16).map(|_| rng.random::<f32>()).collect()))
            .collect();
        index.add_batch(&vectors).unwrap();

        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("random.vec");
        save(&index, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bad.vec");
        std::fs::write(&path, b"NOPE\x01\x00\x00\x00").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_load_rejects_unsupported_version() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("vers.vec");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&99u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_load_rejects_truncated_data() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("trunc.vec");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes()); // dim
        bytes.extend_from_slice(&3u32.to_le_bytes()); // count
        bytes.extend_from_slice(&1.0f32.to_le_bytes()); // only 1 of 6 values
        std::fs::write(&path, bytes).unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = load(&temp.path().join("absent.vec"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
