//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut};

use crate::packet::error::{DecodeError, DecodeResult};

pub const HELLO_BODY_LEN: u16 = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hello {
    pub network_mask: Ipv4Addr,
    pub hello_interval: u16,
}

// ===== impl Hello =====

impl Hello {
    pub fn decode(buf: &mut bytes::Bytes) -> DecodeResult<Self> {
        if buf.remaining() < HELLO_BODY_LEN as usize {
            return Err(DecodeError::Truncated);
        }

        let network_mask = Ipv4Addr::from(buf.get_u32());
        let hello_interval = buf.get_u16();
        let _padding = buf.get_u16();

        Ok(Hello {
            network_mask,
            hello_interval,
        })
    }

    pub fn encode(&self, buf: &mut bytes::BytesMut) {
        buf.put_u32(self.network_mask.into());
        buf.put_u16(self.hello_interval);
        buf.put_u16(0); // padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_hello_body() {
        let hello = Hello {
            network_mask: Ipv4Addr::new(255, 255, 255, 254),
            hello_interval: 5,
        };
        let mut buf = bytes::BytesMut::new();
        hello.encode(&mut buf);
        assert_eq!(buf.len(), HELLO_BODY_LEN as usize);

        let mut bytes = buf.freeze();
        let decoded = Hello::decode(&mut bytes).unwrap();
        assert_eq!(hello, decoded);
    }
}
