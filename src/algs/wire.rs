//! Fixed, versioned, little-endian envelope for subtree messages.
//!
//! A message is a [`WireHdr`] followed by the bincode encoding of one
//! [`TreeNode`]. The header pins the version, the direction of the message
//! and the payload length so a truncated or foreign buffer is rejected
//! before bincode ever sees it. A decoded tree must also pass
//! [`DebugInvariants::validate_invariants`] before it is handed out.
//!
//! A [`WireKind::Abort`] message is a bare header with no payload. The
//! coordinator sends it to release workers when a round fails.

use crate::debug_invariants::DebugInvariants;
use crate::tree::node::TreeNode;
use crate::tree_error::TreeError;
use bytemuck::{Pod, Zeroable};
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::size_of;

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Direction of a subtree message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum WireKind {
    /// Coordinator → worker: an unvisited subtree to traverse.
    Subtree = 1,
    /// Worker → coordinator: the subtree after traversal.
    Visited = 2,
    /// Coordinator → worker: the round failed, stop waiting.
    Abort = 3,
}

/// All multi-byte integers are stored pre-LE with `.to_le()`.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,
    pub kind_le: u16,
    pub len_le: u32, // payload bytes following the header
}

impl WireHdr {
    pub fn new(kind: WireKind, len: usize) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: (kind as u16).to_le(),
            len_le: (len as u32).to_le(),
        }
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn payload_len(&self) -> usize {
        u32::from_le(self.len_le) as usize
    }
}

pub fn expect_exact_len(actual: usize, expected: usize) -> Result<(), TreeError> {
    if actual == expected {
        Ok(())
    } else {
        Err(TreeError::Wire(format!(
            "expected {expected} payload bytes, got {actual}"
        )))
    }
}

/// Serialize a subtree into a single message.
pub fn encode_subtree(kind: WireKind, node: &TreeNode) -> Result<Bytes, TreeError> {
    let payload = bincode::serialize(node)?;
    if payload.len() > u32::MAX as usize {
        return Err(TreeError::Wire(format!(
            "subtree payload of {} bytes exceeds the u32 length field",
            payload.len()
        )));
    }
    let hdr = WireHdr::new(kind, payload.len());
    let mut buf = BytesMut::with_capacity(size_of::<WireHdr>() + payload.len());
    buf.put_slice(bytemuck::bytes_of(&hdr));
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// Header-only message telling a worker the round was abandoned.
pub fn encode_abort() -> Bytes {
    Bytes::copy_from_slice(bytemuck::bytes_of(&WireHdr::new(WireKind::Abort, 0)))
}

/// Rebuild a subtree from a message, checking version, kind, length and the
/// shape of the decoded tree.
///
/// # Errors
/// [`TreeError::Aborted`] if the message is an abort from rank 0.
pub fn decode_subtree(expected: WireKind, buf: &[u8]) -> Result<TreeNode, TreeError> {
    let hdr_len = size_of::<WireHdr>();
    if buf.len() < hdr_len {
        return Err(TreeError::Wire(format!(
            "message of {} bytes is shorter than the {hdr_len}-byte header",
            buf.len()
        )));
    }
    let hdr: WireHdr = bytemuck::pod_read_unaligned(&buf[..hdr_len]);
    if hdr.version() != WIRE_VERSION {
        return Err(TreeError::WireVersion {
            expected: WIRE_VERSION,
            found: hdr.version(),
        });
    }
    if hdr.kind() == WireKind::Abort as u16 {
        return Err(TreeError::Aborted);
    }
    if hdr.kind() != expected as u16 {
        return Err(TreeError::Wire(format!(
            "expected message kind {}, got {}",
            expected as u16,
            hdr.kind()
        )));
    }
    let payload = &buf[hdr_len..];
    expect_exact_len(payload.len(), hdr.payload_len())?;
    let node: TreeNode = bincode::deserialize(payload)?;
    node.validate_invariants()?;
    Ok(node)
}
