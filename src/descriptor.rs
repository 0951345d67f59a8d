//! Decoding JVM type descriptors into display class names.
//!
//! `GetClassSignature` reports the type of an object in the JVM's internal descriptor
//! encoding. This module turns such descriptors into the dotted form users know:
//!
//! | Descriptor              | Class name           |
//! |-------------------------|----------------------|
//! | `Ljava/util/ArrayList;` | `java.util.ArrayList`|
//! | `[Ljava/lang/String;`   | `java.lang.String[]` |
//! | `I`, `J`, `[I`          | *(none)*             |
//!
//! # Rules
//!
//! - A descriptor without the reference marker `L` is a primitive (or primitive array) and
//!   yields no name. This is not an error; the caller simply skips the event.
//! - The name spans from the byte after the first `L` up to the **last** `;`. A missing
//!   terminator, a terminator before the marker, or an empty name also yield no name.
//! - Every `/` becomes `.`.
//! - If a `[` occurs *anywhere* in the descriptor, a single `[]` is appended. Multi
//!   dimensional arrays (`[[Lfoo;`) therefore get one suffix, and a `[` inside the class
//!   name itself would trigger it as well. This matches the long-standing output format of
//!   the agent and is kept as is.
//!
//! Two layers are provided: [`Descriptor`] is the pure, allocation-free parse, usable from
//! anywhere; [`decode`] renders it into a [`ClassName`] held in host memory, as the
//! allocation callback needs.

use std::{borrow::Cow, fmt};

use crate::{
    host::{Host, HostBuffer, HostResult},
    reporter, Result,
};

/// Marker introducing a reference type.
pub const REFERENCE_MARKER: u8 = b'L';
/// Terminator of a reference type name.
pub const TERMINATOR: u8 = b';';
/// Marker introducing an array dimension.
pub const ARRAY_MARKER: u8 = b'[';
/// Package separator inside descriptors.
pub const INTERNAL_SEPARATOR: u8 = b'/';
/// Package separator of display names.
pub const DISPLAY_SEPARATOR: u8 = b'.';
/// Suffix appended to array class names.
pub const ARRAY_SUFFIX: &[u8] = b"[]";

/// A parsed reference type descriptor, borrowing the descriptor bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor<'a> {
    name: &'a [u8],
    is_array: bool,
}

impl<'a> Descriptor<'a> {
    /// Parse `descriptor`; `None` for primitives and anything without a well-formed name.
    ///
    /// ## Arguments
    /// * 'descriptor' - The raw descriptor bytes, without a trailing NUL
    #[must_use]
    pub fn parse(descriptor: &'a [u8]) -> Option<Self> {
        let marker = descriptor.iter().position(|b| *b == REFERENCE_MARKER)?;
        let terminator = descriptor.iter().rposition(|b| *b == TERMINATOR)?;

        let name = descriptor.get(marker + 1..terminator)?;
        if name.is_empty() {
            return None;
        }

        Some(Descriptor {
            name,
            is_array: descriptor.contains(&ARRAY_MARKER),
        })
    }

    /// The internal (slash separated) name, e.g. `java/lang/String`.
    #[must_use]
    pub fn internal_name(&self) -> &'a [u8] {
        self.name
    }

    /// Returns `true` if an array marker was present.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Length of the display name in bytes.
    #[must_use]
    pub fn display_len(&self) -> usize {
        self.name.len() + if self.is_array { ARRAY_SUFFIX.len() } else { 0 }
    }

    /// Render the display name into `out`, which must be exactly [`Descriptor::display_len`]
    /// bytes long.
    ///
    /// # Panics
    /// Panics if `out` has the wrong length
    pub fn write_display(&self, out: &mut [u8]) {
        let (name, suffix) = out.split_at_mut(self.name.len());

        for (dst, src) in name.iter_mut().zip(self.name) {
            *dst = if *src == INTERNAL_SEPARATOR {
                DISPLAY_SEPARATOR
            } else {
                *src
            };
        }

        if self.is_array {
            suffix.copy_from_slice(ARRAY_SUFFIX);
        }
    }

    /// The display name as an owned string.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut out = vec![0u8; self.display_len()];
        self.write_display(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// Decode `descriptor` to its display name, without involving a host.
///
/// # Example
///
/// ```rust
/// use countagent::descriptor::display_name;
///
/// assert_eq!(display_name(b"Ljava/util/ArrayList;").as_deref(), Some("java.util.ArrayList"));
/// assert_eq!(display_name(b"[Ljava/lang/String;").as_deref(), Some("java.lang.String[]"));
/// assert_eq!(display_name(b"I"), None);
/// ```
#[must_use]
pub fn display_name(descriptor: &[u8]) -> Option<String> {
    Descriptor::parse(descriptor).map(|d| d.display_name())
}

/// A decoded class name stored in host memory.
///
/// The buffer is released exactly once: through [`ClassName::release`], or on drop.
pub struct ClassName<'h, H: Host> {
    buffer: HostBuffer<'h, H>,
    len: usize,
}

impl<'h, H: Host> ClassName<'h, H> {
    /// The display name bytes, without the trailing NUL.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_bytes()[..self.len]
    }

    /// The display name; descriptors are modified UTF-8, so this is lossy for the rare names
    /// that differ from standard UTF-8.
    #[must_use]
    pub fn to_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Release the host buffer now.
    ///
    /// # Errors
    /// Returns the host status if the deallocation is refused
    pub fn release(self) -> HostResult<()> {
        self.buffer.release()
    }
}

impl<H: Host> fmt::Display for ClassName<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl<H: Host> fmt::Debug for ClassName<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassName").field(&self.to_str()).finish()
    }
}

/// Decode `descriptor` into a NUL-terminated class name allocated from `host`.
///
/// Exactly one host allocation happens for a decodable descriptor and none otherwise. The
/// descriptor itself is only read; releasing it stays with the caller.
///
/// ## Arguments
/// * 'host'       - The host providing the allocator
/// * 'descriptor' - The raw descriptor bytes, without a trailing NUL
///
/// # Errors
/// Returns [`crate::Error::Jvmti`] if the host refuses the allocation
pub fn decode<'h, H: Host>(host: &'h H, descriptor: &[u8]) -> Result<Option<ClassName<'h, H>>> {
    let Some(parsed) = Descriptor::parse(descriptor) else {
        return Ok(None);
    };

    let len = parsed.display_len();
    let mut buffer = reporter::check(
        HostBuffer::allocate(host, len + 1),
        "Unable to allocate memory for the class name",
    )?;

    let bytes = buffer.as_mut_bytes();
    parsed.write_display(&mut bytes[..len]);
    bytes[len] = 0;

    Ok(Some(ClassName { buffer, len }))
}
