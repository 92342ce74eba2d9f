//! Useful macros for implementing new document types

#[macro_export]
/// Implement `serde::Serialize` and `serde::Deserialize` by passing through to the hex
/// encoding of the type's `ByteFormat`. The calling crate must depend on `serde`.
macro_rules! impl_hex_serde {
    ($item:ty) => {
        impl serde::Serialize for $item {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let s = $crate::ser::ByteFormat::serialize_hex(self)
                    .map_err(<S::Error as serde::ser::Error>::custom)?;
                serializer.serialize_str(&s)
            }
        }

        impl<'de> serde::Deserialize<'de> for $item {
            fn deserialize<D>(deserializer: D) -> Result<$item, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s: String = serde::Deserialize::deserialize(deserializer)?;
                <$item as $crate::ser::ByteFormat>::deserialize_hex(&s)
                    .map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }
    };
}

#[macro_export]
/// Make a new marked digest wrapping a 32-byte sha256 digest.
///
/// Marked digests cannot be confused with one another, or with other 32-byte values, even
/// though they share a representation. The calling crate must depend on `serde` and `hex`.
macro_rules! mark_32_byte_hash {
    (
        $(#[$outer:meta])*
        $hash_name:ident
    ) => {
        $(#[$outer])*
        #[derive(Hash, Copy, Clone, Default, Debug, Eq, PartialEq)]
        pub struct $hash_name(pub $crate::hashes::Sha256Digest);

        impl $hash_name {
            /// Return the digest as lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; 32]> for $hash_name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8; 32]> for $hash_name {
            fn as_ref(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl $crate::ser::ByteFormat for $hash_name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                32
            }

            fn read_from<R>(reader: &mut R) -> $crate::ser::SerResult<Self>
            where
                R: std::io::Read,
                Self: std::marker::Sized,
            {
                Ok(Self($crate::ser::read_fixed_opaque(reader)?))
            }

            fn write_to<W>(&self, writer: &mut W) -> $crate::ser::SerResult<usize>
            where
                W: std::io::Write,
            {
                $crate::ser::write_fixed_opaque(writer, &self.0)
            }
        }

        impl $crate::hashes::MarkedDigest for $hash_name {
            type Digest = $crate::hashes::Sha256Digest;

            fn new(hash: $crate::hashes::Sha256Digest) -> Self {
                Self(hash)
            }

            fn internal(&self) -> $crate::hashes::Sha256Digest {
                self.0
            }

            fn bytes(&self) -> Vec<u8> {
                self.0.to_vec()
            }
        }

        $crate::impl_hex_serde!($hash_name);
    };
}
