//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut};

use crate::packet::error::{DecodeError, DecodeResult};

pub const LSU_BODY_HDR_LEN: u16 = 6;
pub const ADVERT_LEN: u16 = 12;

// A stub advertisement has no OSPF peer on the other side of the link
// (spec.md §3, §9 open question: stub adverts carry an explicit zero).
pub const STUB_NEIGHBOR: Ipv4Addr = Ipv4Addr::UNSPECIFIED;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Advertisement {
    pub subnet: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub neighbor_router_id: Ipv4Addr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lsu {
    pub sequence: u16,
    pub ttl: u8,
    pub adverts: Vec<Advertisement>,
}

// ===== impl Advertisement =====

impl Advertisement {
    pub fn is_stub(&self) -> bool {
        self.neighbor_router_id == STUB_NEIGHBOR
    }

    fn decode(buf: &mut bytes::Bytes) -> DecodeResult<Self> {
        if buf.remaining() < ADVERT_LEN as usize {
            return Err(DecodeError::Truncated);
        }

        let subnet = Ipv4Addr::from(buf.get_u32());
        let mask = Ipv4Addr::from(buf.get_u32());
        let neighbor_router_id = Ipv4Addr::from(buf.get_u32());

        Ok(Advertisement {
            subnet,
            mask,
            neighbor_router_id,
        })
    }

    fn encode(&self, buf: &mut bytes::BytesMut) {
        buf.put_u32(self.subnet.into());
        buf.put_u32(self.mask.into());
        buf.put_u32(self.neighbor_router_id.into());
    }
}

// ===== impl Lsu =====

impl Lsu {
    pub fn wire_len(&self) -> u16 {
        LSU_BODY_HDR_LEN + self.adverts.len() as u16 * ADVERT_LEN
    }

    pub fn decode(buf: &mut bytes::Bytes) -> DecodeResult<Self> {
        if buf.remaining() < LSU_BODY_HDR_LEN as usize {
            return Err(DecodeError::Truncated);
        }

        let sequence = buf.get_u16();
        let ttl = buf.get_u8();
        let _reserved = buf.get_u8();
        let num_adverts = buf.get_u16();

        let mut adverts = Vec::with_capacity(num_adverts as usize);
        for _ in 0..num_adverts {
            adverts.push(Advertisement::decode(buf)?);
        }

        Ok(Lsu { sequence, ttl, adverts })
    }

    pub fn encode(&self, buf: &mut bytes::BytesMut) {
        buf.put_u16(self.sequence);
        buf.put_u8(self.ttl);
        buf.put_u8(0); // reserved
        buf.put_u16(self.adverts.len() as u16);
        for advert in &self.adverts {
            advert.encode(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_lsu_body() {
        let lsu = Lsu {
            sequence: 7,
            ttl: 64,
            adverts: vec![
                Advertisement {
                    subnet: Ipv4Addr::new(10, 1, 0, 0),
                    mask: Ipv4Addr::new(255, 255, 255, 254),
                    neighbor_router_id: Ipv4Addr::new(4, 4, 4, 4),
                },
                Advertisement {
                    subnet: Ipv4Addr::new(10, 2, 0, 0),
                    mask: Ipv4Addr::new(255, 255, 255, 254),
                    neighbor_router_id: STUB_NEIGHBOR,
                },
            ],
        };
        let mut buf = bytes::BytesMut::new();
        lsu.encode(&mut buf);
        assert_eq!(buf.len(), lsu.wire_len() as usize);

        let mut bytes = buf.freeze();
        let decoded = Lsu::decode(&mut bytes).unwrap();
        assert_eq!(lsu, decoded);
        assert!(decoded.adverts[1].is_stub());
    }
}
