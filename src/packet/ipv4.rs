//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut};
use internet_checksum::Checksum;

use crate::packet::error::{DecodeError, DecodeResult};

pub const IPV4_HDR_LEN: usize = 20;
pub const IPV4_VERSION_IHL: u8 = 0x45;
pub const IP_PROTO_OSPF: u8 = 89;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ipv4Header {
    pub ttl: u8,
    pub protocol: u8,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    // Total length of the IPv4 datagram (header + payload), filled in on
    // encode from the actual payload size.
    pub total_length: u16,
}

// ===== impl Ipv4Header =====

impl Ipv4Header {
    pub fn decode(buf: &mut bytes::Bytes) -> DecodeResult<Self> {
        if buf.remaining() < IPV4_HDR_LEN {
            return Err(DecodeError::Truncated);
        }

        let version_ihl = buf.get_u8();
        let version = version_ihl >> 4;
        let ihl = version_ihl & 0x0f;
        if version != 4 {
            return Err(DecodeError::InvalidIpVersion(version));
        }
        if ihl != 5 {
            return Err(DecodeError::InvalidIpHdrLen(ihl));
        }

        let _tos = buf.get_u8();
        let total_length = buf.get_u16();
        if (total_length as usize) < IPV4_HDR_LEN {
            return Err(DecodeError::InvalidIpTotalLength(total_length));
        }
        let _id = buf.get_u16();
        let _flags_frag = buf.get_u16();
        let ttl = buf.get_u8();
        let protocol = buf.get_u8();
        let _checksum = buf.get_u16();
        let src = Ipv4Addr::from(buf.get_u32());
        let dst = Ipv4Addr::from(buf.get_u32());

        if protocol != IP_PROTO_OSPF {
            return Err(DecodeError::InvalidIpProto(protocol));
        }

        Ok(Ipv4Header {
            ttl,
            protocol,
            src,
            dst,
            total_length,
        })
    }

    pub fn encode(&self, buf: &mut bytes::BytesMut) {
        let start = buf.len();

        buf.put_u8(IPV4_VERSION_IHL);
        buf.put_u8(0); // tos
        buf.put_u16(self.total_length);
        buf.put_u16(0); // id
        buf.put_u16(0); // flags/fragment offset
        buf.put_u8(self.ttl);
        buf.put_u8(self.protocol);
        buf.put_u16(0); // checksum placeholder
        buf.put_u32(self.src.into());
        buf.put_u32(self.dst.into());

        let checksum = checksum(&buf[start..start + IPV4_HDR_LEN]);
        buf[start + 10..start + 12].copy_from_slice(&checksum);
    }
}

fn checksum(data: &[u8]) -> [u8; 2] {
    let mut cksum = Checksum::new();
    cksum.add_bytes(data);
    cksum.checksum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_header() {
        let hdr = Ipv4Header {
            ttl: 64,
            protocol: IP_PROTO_OSPF,
            src: Ipv4Addr::new(10, 0, 0, 1),
            dst: Ipv4Addr::new(224, 0, 0, 5),
            total_length: 52,
        };
        let mut buf = bytes::BytesMut::new();
        hdr.encode(&mut buf);

        let mut bytes = buf.freeze();
        let decoded = Ipv4Header::decode(&mut bytes).unwrap();
        assert_eq!(hdr, decoded);
    }

    #[test]
    fn rejects_non_ospf_protocol() {
        let hdr = Ipv4Header {
            ttl: 64,
            protocol: 17,
            src: Ipv4Addr::new(10, 0, 0, 1),
            dst: Ipv4Addr::new(10, 0, 0, 2),
            total_length: 28,
        };
        let mut buf = bytes::BytesMut::new();
        hdr.encode(&mut buf);

        let mut bytes = buf.freeze();
        assert_eq!(Ipv4Header::decode(&mut bytes), Err(DecodeError::InvalidIpProto(17)));
    }
}
