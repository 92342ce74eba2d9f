use sha2::{Digest as _, Sha256};
use std::io::{Result as IOResult, Write};

use crate::hashes::marked::MarkedDigestWriter;

/// A sha256 digest.
pub type Sha256Digest = [u8; 32];

/// A struct that exposes a sha256 `Write` interface by wrapping an internal SHA2 instance.
///
/// ```
/// # use std::io::{Result};
/// use std::io::Write;
/// use lumens_core::hashes::{Sha256Writer, MarkedDigestWriter};
///
/// # fn main() -> Result<()> {
/// let mut w = Sha256Writer::default();
/// # let data = [0u8; 32];
///
/// // Writing more than once will update the hasher.
/// w.write_all(&data)?;
///
/// // Call finish to consume the hasher and produce the digest.
/// let digest = w.finish();
/// # Ok(())
/// }
/// ```
#[derive(Default)]
pub struct Sha256Writer {
    internal: Sha256,
}

impl Write for Sha256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl MarkedDigestWriter<Sha256Digest> for Sha256Writer {
    fn finish(self) -> Sha256Digest {
        self.internal.finalize().into()
    }
}

/// Convenience function for hashing a byte slice.
pub fn sha256(data: &[u8]) -> Sha256Digest {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_ignores_flush() {
        let mut w = Sha256Writer::default();
        w.write_all(&[0]).unwrap();
        w.flush().unwrap();
        assert_eq!(
            hex::encode(w.finish()),
            "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d"
        );
    }

    #[test]
    fn it_matches_one_shot_hashing() {
        let mut w = Sha256Writer::default();
        w.write_all(b"Test SDF Network").unwrap();
        w.write_all(b" ; September 2015").unwrap();
        assert_eq!(w.finish(), sha256(b"Test SDF Network ; September 2015"));
    }
}
