//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;

// Wire-format decode errors. All of these are silent drops at the call
// site (spec.md §7) -- they never propagate past the codec boundary.
#[derive(Debug, Eq, PartialEq)]
pub enum DecodeError {
    Truncated,
    InvalidEtherType(u16),
    InvalidIpVersion(u8),
    InvalidIpHdrLen(u8),
    InvalidIpProto(u8),
    InvalidIpTotalLength(u16),
    InvalidOspfVersion(u8),
    UnknownPacketType(u8),
    InvalidPacketLength(u16),
    InvalidChecksum,
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Truncated => {
                write!(f, "truncated packet")
            }
            DecodeError::InvalidEtherType(etype) => {
                write!(f, "unexpected EtherType: 0x{:04x}", etype)
            }
            DecodeError::InvalidIpVersion(version) => {
                write!(f, "invalid IP version: {}", version)
            }
            DecodeError::InvalidIpHdrLen(ihl) => {
                write!(f, "invalid IP header length: {}", ihl)
            }
            DecodeError::InvalidIpProto(proto) => {
                write!(f, "unexpected IP protocol: {}", proto)
            }
            DecodeError::InvalidIpTotalLength(len) => {
                write!(f, "invalid IP total length: {}", len)
            }
            DecodeError::InvalidOspfVersion(version) => {
                write!(f, "invalid OSPF version: {}", version)
            }
            DecodeError::UnknownPacketType(pkt_type) => {
                write!(f, "unknown OSPF packet type: {}", pkt_type)
            }
            DecodeError::InvalidPacketLength(pkt_len) => {
                write!(f, "invalid OSPF packet length: {}", pkt_len)
            }
            DecodeError::InvalidChecksum => {
                write!(f, "invalid OSPF checksum")
            }
        }
    }
}

impl std::error::Error for DecodeError {}
