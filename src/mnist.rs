//! Loader for the gzipped MNIST IDX distribution files.
//!
//! The IDX format is a big-endian magic number (2051 for images, 2049 for
//! labels), one 32-bit count per dimension, then the raw byte payload. Images
//! are flattened to `rows * cols x 1` column vectors with pixels scaled to
//! `[0, 1]`; labels become one-hot `10 x 1` column vectors.
//!
//! Training and evaluation never see this module directly; it only produces
//! [`Set`] values.

use crate::data::Set;
use crate::matrix::DenseMatrix;
use crate::{Error, Result};

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use log::debug;

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Number of digit classes in the label set.
pub const NUM_CLASSES: usize = 10;

const LABEL_MAGIC: i32 = 2049;
const IMAGE_MAGIC: i32 = 2051;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte.gz";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte.gz";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte.gz";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte.gz";

/// A decoded IDX file: per-dimension counts and the raw payload.
#[derive(Debug)]
struct IdxFile {
    sizes: Vec<usize>,
    data: Vec<u8>,
}

fn parse_idx(bytes: &[u8]) -> Result<IdxFile> {
    let mut reader = Cursor::new(bytes);
    let magic = reader.read_i32::<BigEndian>()?;
    let num_dims = match magic {
        LABEL_MAGIC => 1,
        IMAGE_MAGIC => 3,
        _ => {
            return Err(Error::InvalidData(format!(
                "unrecognized idx magic number {magic}"
            )))
        }
    };

    let mut sizes = Vec::with_capacity(num_dims);
    for _ in 0..num_dims {
        let size = reader.read_i32::<BigEndian>()?;
        if size < 0 {
            return Err(Error::InvalidData(format!(
                "negative idx dimension count {size}"
            )));
        }
        sizes.push(size as usize);
    }

    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let expected: usize = sizes.iter().product();
    if data.len() < expected {
        return Err(Error::InvalidData(format!(
            "idx payload has {} bytes, header promises {expected}",
            data.len()
        )));
    }
    Ok(IdxFile { sizes, data })
}

fn read_idx(path: &Path) -> Result<IdxFile> {
    let file = File::open(path)?;
    let mut gz = GzDecoder::new(file);
    let mut contents = Vec::new();
    gz.read_to_end(&mut contents)?;
    parse_idx(&contents)
}

fn one_hot(label: u8) -> Result<DenseMatrix> {
    let label = label as usize;
    if label >= NUM_CLASSES {
        return Err(Error::InvalidData(format!(
            "label {label} is outside the {NUM_CLASSES}-class label set"
        )));
    }
    let mut target = DenseMatrix::zeros(NUM_CLASSES, 1);
    target.set(label, 0, 1.0);
    Ok(target)
}

fn build_set(images: &IdxFile, labels: &IdxFile) -> Result<Set> {
    if images.sizes.len() != 3 || labels.sizes.len() != 1 {
        return Err(Error::InvalidData(
            "image and label files are swapped or malformed".to_owned(),
        ));
    }
    let count = images.sizes[0];
    if labels.sizes[0] != count {
        return Err(Error::InvalidData(format!(
            "image file holds {count} images but label file holds {} labels",
            labels.sizes[0]
        )));
    }
    let pixels = images.sizes[1] * images.sizes[2];

    let mut pairs = Vec::with_capacity(count);
    for i in 0..count {
        let plane = &images.data[i * pixels..(i + 1) * pixels];
        let values: Vec<f64> = plane.iter().map(|&b| f64::from(b) / 255.0).collect();
        let input = DenseMatrix::column(&values);
        let target = one_hot(labels.data[i])?;
        pairs.push((input, target));
    }
    Set::from_pairs(pairs)
}

/// Read one image/label file pair into a [`Set`].
pub fn read_set(images_path: &Path, labels_path: &Path) -> Result<Set> {
    let images = read_idx(images_path)?;
    let labels = read_idx(labels_path)?;
    let set = build_set(&images, &labels)?;
    debug!(
        "loaded {} examples ({}x{} pixels) from {}",
        set.len(),
        images.sizes[1],
        images.sizes[2],
        images_path.display()
    );
    Ok(set)
}

/// Read the training and test sets from a directory containing the four
/// gzipped MNIST distribution files.
pub fn load(dir: &Path) -> Result<(Set, Set)> {
    let train = read_set(&dir.join(TRAIN_IMAGES), &dir.join(TRAIN_LABELS))?;
    let test = read_set(&dir.join(TEST_IMAGES), &dir.join(TEST_LABELS))?;
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn idx_bytes(magic: i32, sizes: &[i32], payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&magic.to_be_bytes());
        for &s in sizes {
            bytes.extend_from_slice(&s.to_be_bytes());
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parse_idx_accepts_both_magics() {
        let labels = parse_idx(&idx_bytes(LABEL_MAGIC, &[3], &[0, 1, 2])).unwrap();
        assert_eq!(labels.sizes, vec![3]);
        assert_eq!(labels.data, vec![0, 1, 2]);

        let images = parse_idx(&idx_bytes(IMAGE_MAGIC, &[1, 2, 2], &[0, 64, 128, 255])).unwrap();
        assert_eq!(images.sizes, vec![1, 2, 2]);
        assert_eq!(images.data.len(), 4);
    }

    #[test]
    fn parse_idx_rejects_bad_magic_and_short_payloads() {
        assert!(matches!(
            parse_idx(&idx_bytes(1234, &[1], &[0])),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_idx(&idx_bytes(IMAGE_MAGIC, &[2, 2, 2], &[0, 0, 0])),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn build_set_normalizes_pixels_and_one_hot_encodes_labels() {
        let images = parse_idx(&idx_bytes(
            IMAGE_MAGIC,
            &[2, 2, 2],
            &[0, 51, 102, 255, 255, 204, 153, 0],
        ))
        .unwrap();
        let labels = parse_idx(&idx_bytes(LABEL_MAGIC, &[2], &[7, 0])).unwrap();

        let set = build_set(&images, &labels).unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.input_dim(), 4);
        assert_eq!(set.target_dim(), NUM_CLASSES);

        let (input, target) = set.sample(0);
        assert_eq!(input.get(0, 0), 0.0);
        assert!((input.get(1, 0) - 51.0 / 255.0).abs() < 1e-12);
        assert_eq!(input.get(3, 0), 1.0);
        assert_eq!(target.get(7, 0), 1.0);
        assert_eq!(target.as_slice().iter().sum::<f64>(), 1.0);

        let (_, target) = set.sample(1);
        assert_eq!(target.get(0, 0), 1.0);
    }

    #[test]
    fn build_set_rejects_count_mismatch_and_bad_labels() {
        let images = parse_idx(&idx_bytes(IMAGE_MAGIC, &[1, 1, 1], &[9])).unwrap();
        let labels = parse_idx(&idx_bytes(LABEL_MAGIC, &[2], &[1, 2])).unwrap();
        assert!(matches!(
            build_set(&images, &labels),
            Err(Error::InvalidData(_))
        ));

        let labels = parse_idx(&idx_bytes(LABEL_MAGIC, &[1], &[10])).unwrap();
        assert!(matches!(
            build_set(&images, &labels),
            Err(Error::InvalidData(_))
        ));
    }
}
