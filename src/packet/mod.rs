//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod eth;
pub mod error;
pub mod hello;
pub mod ipv4;
pub mod lsu;

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use internet_checksum::Checksum;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub use eth::{EthernetHeader, MacAddr};
pub use error::{DecodeError, DecodeResult};
pub use hello::Hello;
pub use ipv4::Ipv4Header;
pub use lsu::{Advertisement, Lsu};

use eth::ETH_HDR_LEN;
use ipv4::IPV4_HDR_LEN;

pub const OSPF_VERSION: u8 = 2;
pub const OSPF_HDR_LEN: u16 = 24;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive)]
pub enum PacketType {
    Hello = 1,
    Lsu = 4,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OspfHeader {
    pub pkt_type: PacketType,
    pub router_id: Ipv4Addr,
    pub area_id: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Body {
    Hello(Hello),
    Lsu(Lsu),
}

// A fully decoded ingress/egress frame: Ethernet + IPv4 + OSPFv2 header +
// body. The codec owns the whole frame rather than stopping at the OSPF
// header, since `spec.md` §4.A lists checksum validation and length
// checks that span the IP and OSPF layers together.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub eth: EthernetHeader,
    pub ip: Ipv4Header,
    pub hdr: OspfHeader,
    pub body: Body,
}

// ===== impl Body =====

impl Body {
    fn wire_len(&self) -> u16 {
        match self {
            Body::Hello(_) => hello::HELLO_BODY_LEN,
            Body::Lsu(lsu) => lsu.wire_len(),
        }
    }

    fn encode(&self, buf: &mut BytesMut) {
        match self {
            Body::Hello(hello) => hello.encode(buf),
            Body::Lsu(lsu) => lsu.encode(buf),
        }
    }
}

// ===== impl OspfHeader =====

impl OspfHeader {
    fn decode(buf: &mut Bytes, body_len: u16) -> DecodeResult<(Self, u16)> {
        if buf.remaining() < OSPF_HDR_LEN as usize {
            return Err(DecodeError::Truncated);
        }

        let version = buf.get_u8();
        if version != OSPF_VERSION {
            return Err(DecodeError::InvalidOspfVersion(version));
        }
        let pkt_type = buf.get_u8();
        let pkt_type = PacketType::from_u8(pkt_type).ok_or(DecodeError::UnknownPacketType(pkt_type))?;
        let len = buf.get_u16();
        if len != OSPF_HDR_LEN + body_len {
            return Err(DecodeError::InvalidPacketLength(len));
        }
        let router_id = Ipv4Addr::from(buf.get_u32());
        let area_id = buf.get_u32();
        let _checksum = buf.get_u16();
        let _autype = buf.get_u16();
        let _auth = buf.get_u64();

        Ok((
            OspfHeader {
                pkt_type,
                router_id,
                area_id,
            },
            len,
        ))
    }

    fn encode(&self, buf: &mut BytesMut, len: u16) {
        buf.put_u8(OSPF_VERSION);
        buf.put_u8(self.pkt_type as u8);
        buf.put_u16(len);
        buf.put_u32(self.router_id.into());
        buf.put_u32(self.area_id);
        buf.put_u16(0); // checksum placeholder
        buf.put_u16(0); // autype
        buf.put_u64(0); // auth
    }
}

// ===== impl Frame =====

impl Frame {
    pub fn new(eth: EthernetHeader, ip: Ipv4Header, hdr: OspfHeader, body: Body) -> Self {
        Frame { eth, ip, hdr, body }
    }

    // Accepts the frame's area_id against the local area (spec.md §4.A,
    // §9: area mismatch is a silent drop, not a decode error).
    pub fn area_matches(&self, local_area: u32) -> bool {
        self.hdr.area_id == local_area
    }

    pub fn decode(data: &[u8]) -> DecodeResult<Self> {
        let mut buf = Bytes::copy_from_slice(data);
        let eth = EthernetHeader::decode(&mut buf)?;

        let ip = Ipv4Header::decode(&mut buf)?;
        let ip_total_len = ip.total_length;
        let ospf_len = ip_total_len
            .checked_sub(IPV4_HDR_LEN as u16)
            .ok_or(DecodeError::InvalidIpTotalLength(ip_total_len))?;
        if (ospf_len as usize) < OSPF_HDR_LEN as usize {
            return Err(DecodeError::InvalidPacketLength(ospf_len));
        }
        let body_len = ospf_len - OSPF_HDR_LEN;

        let ospf_start = buf.clone();
        let (hdr, pkt_len) = OspfHeader::decode(&mut buf, body_len)?;
        if pkt_len != ospf_len {
            return Err(DecodeError::InvalidPacketLength(pkt_len));
        }

        if !verify_checksum(&ospf_start, pkt_len as usize) {
            return Err(DecodeError::InvalidChecksum);
        }

        let body = match hdr.pkt_type {
            PacketType::Hello => Body::Hello(Hello::decode(&mut buf)?),
            PacketType::Lsu => Body::Lsu(Lsu::decode(&mut buf)?),
        };

        Ok(Frame { eth, ip, hdr, body })
    }

    pub fn encode(&self) -> Bytes {
        let body_len = self.body.wire_len();
        let ospf_len = OSPF_HDR_LEN + body_len;
        let ip_total_len = IPV4_HDR_LEN as u16 + ospf_len;

        let mut buf = BytesMut::with_capacity(ETH_HDR_LEN + ip_total_len as usize);
        self.eth.encode(&mut buf);

        let ip = Ipv4Header {
            total_length: ip_total_len,
            ..self.ip
        };
        ip.encode(&mut buf);

        let ospf_start = buf.len();
        self.hdr.encode(&mut buf, ospf_len);
        self.body.encode(&mut buf);

        let checksum = checksum(&buf[ospf_start..ospf_start + ospf_len as usize]);
        buf[ospf_start + 12..ospf_start + 14].copy_from_slice(&checksum);

        buf.freeze()
    }
}

fn checksum(data: &[u8]) -> [u8; 2] {
    let mut cksum = Checksum::new();
    cksum.add_bytes(data);
    cksum.checksum()
}

fn verify_checksum(buf: &Bytes, pkt_len: usize) -> bool {
    if buf.remaining() < pkt_len {
        return false;
    }
    checksum(&buf[..pkt_len]) == [0, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use eth::ETHERTYPE_IPV4;
    use ipv4::IP_PROTO_OSPF;

    fn sample_frame() -> Frame {
        Frame::new(
            EthernetHeader {
                dst: eth::MAC_ALL_SPF_ROUTERS,
                src: MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
                ethertype: ETHERTYPE_IPV4,
            },
            Ipv4Header {
                ttl: 1,
                protocol: IP_PROTO_OSPF,
                src: Ipv4Addr::new(10, 0, 0, 1),
                dst: Ipv4Addr::new(224, 0, 0, 5),
                total_length: 0,
            },
            OspfHeader {
                pkt_type: PacketType::Hello,
                router_id: Ipv4Addr::new(1, 1, 1, 1),
                area_id: 171,
            },
            Body::Hello(Hello {
                network_mask: Ipv4Addr::new(255, 255, 255, 254),
                hello_interval: 5,
            }),
        )
    }

    #[test]
    fn round_trips_a_hello_frame() {
        let frame = sample_frame();
        let encoded = frame.encode();
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(frame.eth, decoded.eth);
        assert_eq!(frame.hdr, decoded.hdr);
        assert_eq!(frame.body, decoded.body);
    }

    #[test]
    fn detects_checksum_corruption() {
        let frame = sample_frame();
        let mut encoded = frame.encode().to_vec();
        // Flip a bit inside the HELLO body without updating the checksum.
        let last = encoded.len() - 1;
        encoded[last] ^= 0xff;
        assert_eq!(Frame::decode(&encoded), Err(DecodeError::InvalidChecksum));
    }

    #[test]
    fn area_mismatch_is_detectable_by_caller() {
        let frame = sample_frame();
        assert!(frame.area_matches(171));
        assert!(!frame.area_matches(1));
    }
}
