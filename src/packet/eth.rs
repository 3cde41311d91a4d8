//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, BufMut};

use crate::packet::error::{DecodeError, DecodeResult};

pub const ETH_HDR_LEN: usize = 14;
pub const ETHERTYPE_IPV4: u16 = 0x0800;

// The well-known AllSPFRouters multicast MAC address (spec.md §6).
pub const MAC_ALL_SPF_ROUTERS: MacAddr = MacAddr([0x01, 0x00, 0x5e, 0x00, 0x00, 0x05]);

// Placeholder destination for unicast LSU frames. Resolving a neighbor's
// real MAC is an ARP concern, and spec.md §1 places ARP outside the
// core's scope; the host's forwarding layer is expected to rewrite this
// before the frame reaches the wire.
pub const MAC_BROADCAST: MacAddr = MacAddr([0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct MacAddr(pub [u8; 6]);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EthernetHeader {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
}

// ===== impl MacAddr =====

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

// ===== impl EthernetHeader =====

impl EthernetHeader {
    pub fn decode(buf: &mut bytes::Bytes) -> DecodeResult<Self> {
        if buf.remaining() < ETH_HDR_LEN {
            return Err(DecodeError::Truncated);
        }

        let mut dst = [0u8; 6];
        buf.copy_to_slice(&mut dst);
        let mut src = [0u8; 6];
        buf.copy_to_slice(&mut src);
        let ethertype = buf.get_u16();

        if ethertype != ETHERTYPE_IPV4 {
            return Err(DecodeError::InvalidEtherType(ethertype));
        }

        Ok(EthernetHeader {
            dst: MacAddr(dst),
            src: MacAddr(src),
            ethertype,
        })
    }

    pub fn encode(&self, buf: &mut bytes::BytesMut) {
        buf.put_slice(&self.dst.0);
        buf.put_slice(&self.src.0);
        buf.put_u16(self.ethertype);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_header() {
        let hdr = EthernetHeader {
            dst: MAC_ALL_SPF_ROUTERS,
            src: MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            ethertype: ETHERTYPE_IPV4,
        };
        let mut buf = bytes::BytesMut::new();
        hdr.encode(&mut buf);

        let mut bytes = buf.freeze();
        let decoded = EthernetHeader::decode(&mut bytes).unwrap();
        assert_eq!(hdr, decoded);
    }

    #[test]
    fn rejects_non_ipv4_ethertype() {
        let mut buf = bytes::BytesMut::new();
        buf.put_slice(&[0; 12]);
        buf.put_u16(0x0806);

        let mut bytes = buf.freeze();
        assert_eq!(
            EthernetHeader::decode(&mut bytes),
            Err(DecodeError::InvalidEtherType(0x0806))
        );
    }
}
