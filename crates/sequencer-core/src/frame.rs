//! Frame constants shared with the downstream appender's wire format.
//!
//! The sequencer does not otherwise interpret these — it only uses them in
//! [`crate::Sequencer::can_write_events`] to size-check a prospective batch
//! before the caller builds it. They must match the appender's frame
//! descriptor bit for bit; nothing in this crate derives them.

/// Fixed byte count prepended to each framed entry by the downstream
/// appender (a 4-byte length prefix plus a 4-byte entry type tag).
pub const HEADER_LENGTH: usize = 8;

/// Byte alignment boundary for each framed entry and for the overall
/// batch, as required by the appender's frame descriptor.
pub const FRAME_ALIGNMENT: usize = 8;
