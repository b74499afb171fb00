//! Decoded port-I/O VM exits.
//!
//! An [`IoExit`] borrows the data window the hypervisor shares with the guest (for KVM this is the
//! `kvm_run` page at `io.data_offset`). The borrow ends when the dispatcher returns, so handlers
//! cannot keep the buffer around between traps.

use thiserror::Error;

/// `KVM_EXIT_IO_IN`: the guest executed `in`/`ins`.
pub const KVM_EXIT_IO_IN: u8 = 0;
/// `KVM_EXIT_IO_OUT`: the guest executed `out`/`outs`.
pub const KVM_EXIT_IO_OUT: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoDirection {
    /// Guest reads from the host (`in`). The dispatcher fills the buffer.
    Read,
    /// Guest writes to the host (`out`). The dispatcher only inspects the buffer.
    Write,
}

impl IoDirection {
    pub fn from_kvm(raw: u8) -> Result<Self, IoExitError> {
        match raw {
            KVM_EXIT_IO_IN => Ok(Self::Read),
            KVM_EXIT_IO_OUT => Ok(Self::Write),
            other => Err(IoExitError::InvalidDirection(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "in",
            Self::Write => "out",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IoExitError {
    #[error("invalid I/O exit direction {0}")]
    InvalidDirection(u8),

    #[error("invalid port I/O access size {0} (expected 1, 2 or 4)")]
    InvalidSize(u8),

    #[error("port I/O repeat count must be at least 1")]
    ZeroCount,

    #[error("integer overflow while computing the I/O data length")]
    LengthOverflow,

    #[error("I/O data buffer is {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}

/// One trapped port-I/O access.
#[derive(Debug)]
pub struct IoExit<'a> {
    direction: IoDirection,
    size: u8,
    port: u16,
    count: u32,
    data: &'a mut [u8],
}

impl<'a> IoExit<'a> {
    pub fn new(
        direction: IoDirection,
        size: u8,
        port: u16,
        count: u32,
        data: &'a mut [u8],
    ) -> Result<Self, IoExitError> {
        if !matches!(size, 1 | 2 | 4) {
            return Err(IoExitError::InvalidSize(size));
        }
        if count == 0 {
            return Err(IoExitError::ZeroCount);
        }
        let expected = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(usize::from(size)))
            .ok_or(IoExitError::LengthOverflow)?;
        if data.len() != expected {
            return Err(IoExitError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            direction,
            size,
            port,
            count,
            data,
        })
    }

    /// Builds an exit from the raw fields of a KVM `KVM_EXIT_IO` record.
    pub fn from_kvm(
        direction: u8,
        size: u8,
        port: u16,
        count: u32,
        data: &'a mut [u8],
    ) -> Result<Self, IoExitError> {
        Self::new(IoDirection::from_kvm(direction)?, size, port, count, data)
    }

    pub fn direction(&self) -> IoDirection {
        self.direction
    }

    pub fn is_read(&self) -> bool {
        self.direction == IoDirection::Read
    }

    pub fn is_write(&self) -> bool {
        self.direction == IoDirection::Write
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    /// Single-byte, non-repeated access (`in al, dx` / `out dx, al`).
    pub fn is_single_byte(&self) -> bool {
        self.size == 1 && self.count == 1
    }

    /// Little-endian value of the first element, zero-extended to 32 bits.
    pub fn first_value(&self) -> u32 {
        element_value(self.data(), self.size, 0).unwrap_or(0)
    }

    /// Iterates over every element of a (possibly repeated) access.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        let size = usize::from(self.size);
        self.data
            .chunks_exact(size)
            .map(|chunk| chunk.iter().rev().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
    }

    pub fn set_first_u8(&mut self, value: u8) {
        self.data[0] = value;
    }

    /// Stores `value` into the first element. Byte-wide accesses are left untouched.
    pub fn set_first_u16(&mut self, value: u16) {
        if self.size < 2 {
            return;
        }
        self.data[..2].copy_from_slice(&value.to_le_bytes());
    }
}

/// Little-endian element `index` of `data` at width `size`, or `None` for widths other than
/// 1, 2 and 4 or an out-of-range element.
pub(crate) fn element_value(data: &[u8], size: u8, index: usize) -> Option<u32> {
    let width = usize::from(size);
    let start = index.checked_mul(width)?;
    let bytes = data.get(start..start.checked_add(width)?)?;
    match size {
        1 => Some(u32::from(bytes[0])),
        2 => Some(u32::from(u16::from_le_bytes([bytes[0], bytes[1]]))),
        4 => Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        _ => None,
    }
}
