//! Streaming SHA-256 digests.
//!
//! Readers are hashed in fixed-size chunks so memory use stays bounded no
//! matter how large the artifact is.

use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Size of each read while hashing.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Compute the lowercase hex SHA-256 digest of everything `reader` yields.
///
/// # Errors
///
/// Returns any I/O error raised by the reader.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::checksum::digest::sha256_reader;
///
/// let hex = sha256_reader(&b"abc"[..])?;
/// assert_eq!(hex, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn sha256_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
