use std::io::Write;

/// A marker trait for digest types.
pub trait Digest: Default + Copy + AsRef<[u8]> {}

impl Digest for [u8; 32] {}

/// A `MarkedDigest` is a newtype wrapping a digest, marking its purpose (e.g. a transaction
/// hash).
pub trait MarkedDigest {
    /// The underlying digest type.
    type Digest: Digest;

    /// Wrap a digest of the appropriate type.
    fn new(hash: Self::Digest) -> Self;

    /// Return a copy of the underlying digest.
    fn internal(&self) -> Self::Digest;

    /// Return a vector of the digest bytes.
    fn bytes(&self) -> Vec<u8>;
}

/// A `MarkedDigestWriter` is a `std::io::Write` sink that produces a digest when finished.
/// Documents are hashed by writing their canonical encoding into the sink.
pub trait MarkedDigestWriter<T: Digest>: Default + Write {
    /// Consume the writer and produce the digest.
    fn finish(self) -> T;

    /// Consume the writer and produce the digest, wrapped in a marked newtype.
    fn finish_marked<M: MarkedDigest<Digest = T>>(self) -> M {
        MarkedDigest::new(self.finish())
    }
}
