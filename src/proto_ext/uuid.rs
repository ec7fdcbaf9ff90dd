//! UUID conversion traits.
//!
//! The wire form splits the 128-bit value into two big-endian halves:
//! `hi` carries bytes 0..8 and `lo` carries bytes 8..16.

use crate::proto::Uuid as ProtoUuid;

/// Extension trait for ProtoUuid proto type.
pub trait ProtoUuidExt {
    /// Convert to a standard UUID.
    fn to_uuid(&self) -> uuid::Uuid;
}

impl ProtoUuidExt for ProtoUuid {
    fn to_uuid(&self) -> uuid::Uuid {
        uuid::Uuid::from_u64_pair(self.hi, self.lo)
    }
}

/// Extension trait for uuid::Uuid to convert to proto types.
pub trait UuidExt {
    /// Convert to a ProtoUuid.
    fn to_proto_uuid(&self) -> ProtoUuid;
}

impl UuidExt for uuid::Uuid {
    fn to_proto_uuid(&self) -> ProtoUuid {
        let (hi, lo) = self.as_u64_pair();
        ProtoUuid { hi, lo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves_are_big_endian() {
        let id = uuid::Uuid::from_bytes([
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10,
        ]);

        let proto = id.to_proto_uuid();

        assert_eq!(proto.hi, 0x0102_0304_0506_0708);
        assert_eq!(proto.lo, 0x090a_0b0c_0d0e_0f10);
    }

    #[test]
    fn test_proto_uuid_restores_original() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(id.to_proto_uuid().to_uuid(), id);
    }

    #[test]
    fn test_nil_uuid_is_all_zero() {
        let proto = uuid::Uuid::nil().to_proto_uuid();
        assert_eq!((proto.hi, proto.lo), (0, 0));
    }
}
