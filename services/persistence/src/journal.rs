//! Event journal: append-only, checksummed, gapless event log
//!
//! Every committed event becomes one framed entry in an in-memory byte log.
//! Sequence numbers must continue the journal without gaps; a batch that
//! would break the sequence is refused as a whole, so a transaction is either
//! fully journaled or not at all.
//!
//! # Binary Format (per entry)
//! ```text
//! [body_len:  u32]
//! [sequence:  u64]
//! [timestamp: i64]
//! [event_type_len: u16][event_type: bytes]
//! [payload_len: u32][payload: bytes]
//! [checksum: u32]  // CRC32C over sequence+timestamp+event_type+payload
//! ```

use crc32c::crc32c;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JournalError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Sequence error: expected {expected}, got {got}")]
    SequenceError { expected: u64, got: u64 },

    #[error("Journal size limit exceeded: {current} + {incoming} > {limit} entries")]
    SizeLimitExceeded {
        current: usize,
        incoming: usize,
        limit: usize,
    },

    #[error("Checksum mismatch at byte offset {offset}: entry seq={sequence}")]
    ChecksumMismatch { offset: usize, sequence: u64 },

    #[error("Corruption detected at byte offset {offset}: {detail}")]
    Corruption { offset: usize, detail: String },

    #[error("Timestamp of entry seq={sequence} is outside the Unix nanos range")]
    TimestampOutOfRange { sequence: u64 },
}

// ── Journaled Events ────────────────────────────────────────────────

/// An event that can be written to and replayed from the journal.
///
/// The sequence number doubles as the journal position, so implementors
/// must hand out dense sequence numbers.
pub trait Journaled: Serialize + DeserializeOwned {
    fn sequence(&self) -> u64;

    /// Exchange time of the event in Unix nanos, `None` when it does not
    /// fit in an `i64`
    fn timestamp(&self) -> Option<i64>;

    fn event_type(&self) -> &'static str;
}

// ── Journal Entry ───────────────────────────────────────────────────

/// One persisted event.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub sequence: u64,
    pub timestamp: i64,
    pub event_type: String,
    /// Bincode-serialized event payload
    pub payload: Vec<u8>,
    pub checksum: u32,
}

impl JournalEntry {
    /// Create a new entry, computing the CRC32C checksum automatically.
    pub fn new(sequence: u64, timestamp: i64, event_type: String, payload: Vec<u8>) -> Self {
        let checksum = Self::compute_checksum(sequence, timestamp, &event_type, &payload);
        Self {
            sequence,
            timestamp,
            event_type,
            payload,
            checksum,
        }
    }

    /// Encode an event as an entry.
    pub fn from_event<E: Journaled>(event: &E) -> Result<Self, JournalError> {
        let timestamp = event.timestamp().ok_or(JournalError::TimestampOutOfRange {
            sequence: event.sequence(),
        })?;
        let payload =
            bincode::serialize(event).map_err(|e| JournalError::Serialization(e.to_string()))?;
        Ok(Self::new(
            event.sequence(),
            timestamp,
            event.event_type().to_string(),
            payload,
        ))
    }

    /// Decode the payload back into its event.
    pub fn decode<E: Journaled>(&self) -> Result<E, JournalError> {
        bincode::deserialize(&self.payload).map_err(|e| JournalError::Serialization(e.to_string()))
    }

    pub fn compute_checksum(sequence: u64, timestamp: i64, event_type: &str, payload: &[u8]) -> u32 {
        let mut buf = Vec::with_capacity(16 + event_type.len() + payload.len());
        buf.extend_from_slice(&sequence.to_le_bytes());
        buf.extend_from_slice(&timestamp.to_le_bytes());
        buf.extend_from_slice(event_type.as_bytes());
        buf.extend_from_slice(payload);
        crc32c(&buf)
    }

    pub fn verify_checksum(&self) -> bool {
        self.checksum
            == Self::compute_checksum(self.sequence, self.timestamp, &self.event_type, &self.payload)
    }

    /// Append the framed entry to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), JournalError> {
        let event_type = self.event_type.as_bytes();
        let event_type_len = u16::try_from(event_type.len())
            .map_err(|_| JournalError::Serialization("event type too long".into()))?;
        let payload_len = u32::try_from(self.payload.len())
            .map_err(|_| JournalError::Serialization("payload too long".into()))?;
        let body_len = 8 + 8 + 2 + u32::from(event_type_len) + 4 + payload_len + 4;

        out.extend_from_slice(&body_len.to_le_bytes());
        out.extend_from_slice(&self.sequence.to_le_bytes());
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&event_type_len.to_le_bytes());
        out.extend_from_slice(event_type);
        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.checksum.to_le_bytes());
        Ok(())
    }
}

// ── Frame Cursor ────────────────────────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], JournalError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.data.len());
        match end {
            Some(end) => {
                let bytes = &self.data[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(JournalError::Corruption {
                offset: self.pos,
                detail: format!("need {} bytes, have {}", len, self.data.len() - self.pos),
            }),
        }
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], JournalError> {
        let offset = self.pos;
        self.take(N)?.try_into().map_err(|_| JournalError::Corruption {
            offset,
            detail: format!("short read of {} bytes", N),
        })
    }

    fn u16(&mut self) -> Result<u16, JournalError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, JournalError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, JournalError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, JournalError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    /// Read one framed entry, verifying its checksum.
    fn next_entry(&mut self) -> Result<JournalEntry, JournalError> {
        let offset = self.pos;
        let body_len = self.u32()? as usize;
        let body_start = self.pos;

        let sequence = self.u64()?;
        let timestamp = self.i64()?;
        let event_type_len = self.u16()? as usize;
        let event_type = String::from_utf8(self.take(event_type_len)?.to_vec()).map_err(|e| {
            JournalError::Corruption {
                offset,
                detail: e.to_string(),
            }
        })?;
        let payload_len = self.u32()? as usize;
        let payload = self.take(payload_len)?.to_vec();
        let checksum = self.u32()?;

        if self.pos - body_start != body_len {
            return Err(JournalError::Corruption {
                offset,
                detail: format!("frame length {} does not match body {}", body_len, self.pos - body_start),
            });
        }

        let entry = JournalEntry {
            sequence,
            timestamp,
            event_type,
            payload,
            checksum,
        };
        if !entry.verify_checksum() {
            return Err(JournalError::ChecksumMismatch { offset, sequence });
        }
        Ok(entry)
    }
}

// ── Journal Configuration ───────────────────────────────────────────

/// Configuration for an event journal.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Sequence number the first entry must carry.
    pub first_sequence: u64,
    /// Maximum number of entries (0 = unlimited).
    pub max_entries: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            first_sequence: 0,
            max_entries: 0,
        }
    }
}

// ── Event Journal ───────────────────────────────────────────────────

/// Append-only in-memory journal.
#[derive(Debug, Clone)]
pub struct EventJournal {
    config: JournalConfig,
    bytes: Vec<u8>,
    entry_count: usize,
    next_sequence: u64,
}

impl EventJournal {
    pub fn new(config: JournalConfig) -> Self {
        let next_sequence = config.first_sequence;
        Self {
            config,
            bytes: Vec::new(),
            entry_count: 0,
            next_sequence,
        }
    }

    /// Next sequence number the journal will accept.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Size of the encoded log in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Append a batch of entries atomically.
    ///
    /// The batch must continue the journal's sequence without gaps. Nothing
    /// is written unless every entry is acceptable.
    pub fn append_all(&mut self, entries: &[JournalEntry]) -> Result<(), JournalError> {
        if self.config.max_entries > 0 && self.entry_count + entries.len() > self.config.max_entries {
            return Err(JournalError::SizeLimitExceeded {
                current: self.entry_count,
                incoming: entries.len(),
                limit: self.config.max_entries,
            });
        }

        let mut expected = self.next_sequence;
        for entry in entries {
            if entry.sequence != expected {
                warn!(
                    expected_sequence = expected,
                    received_sequence = entry.sequence,
                    "Refusing journal batch with sequence gap"
                );
                return Err(JournalError::SequenceError {
                    expected,
                    got: entry.sequence,
                });
            }
            expected += 1;
        }

        let mut encoded = Vec::new();
        for entry in entries {
            entry.encode_into(&mut encoded)?;
        }
        self.bytes.extend_from_slice(&encoded);
        self.entry_count += entries.len();
        self.next_sequence = expected;

        debug!(
            entries = entries.len(),
            next_sequence = self.next_sequence,
            bytes = self.bytes.len(),
            "Journal batch appended"
        );
        Ok(())
    }

    /// Encode and append a batch of events atomically.
    pub fn append_events<E: Journaled>(&mut self, events: &[E]) -> Result<(), JournalError> {
        let entries = events
            .iter()
            .map(JournalEntry::from_event)
            .collect::<Result<Vec<_>, _>>()?;
        self.append_all(&entries)
    }

    /// Read every entry in order, verifying checksums and sequence continuity.
    pub fn read_all(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let mut cursor = Cursor::new(&self.bytes);
        let mut entries = Vec::with_capacity(self.entry_count);
        let mut expected = self.config.first_sequence;

        while !cursor.is_at_end() {
            let entry = cursor.next_entry()?;
            if entry.sequence != expected {
                return Err(JournalError::SequenceError {
                    expected,
                    got: entry.sequence,
                });
            }
            expected += 1;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Decode every journaled event in order.
    pub fn replay<E: Journaled>(&self) -> Result<Vec<E>, JournalError> {
        self.read_all()?.iter().map(JournalEntry::decode).collect()
    }

    #[cfg(test)]
    fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(JournalConfig::default())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        seq: u64,
        text: String,
    }

    impl Journaled for Note {
        fn sequence(&self) -> u64 {
            self.seq
        }

        fn timestamp(&self) -> Option<i64> {
            Some(self.seq as i64 * 1_000)
        }

        fn event_type(&self) -> &'static str {
            "Note"
        }
    }

    fn note(seq: u64) -> Note {
        Note {
            seq,
            text: format!("note {}", seq),
        }
    }

    #[test]
    fn test_journal_entry_checksum_detects_tamper() {
        let mut entry = JournalEntry::new(1, 1_000, "Note".to_string(), vec![1, 2, 3]);
        assert!(entry.verify_checksum());
        entry.payload[0] = 9;
        assert!(!entry.verify_checksum());
    }

    #[test]
    fn test_append_and_replay_events() {
        let mut journal = EventJournal::default();
        let notes: Vec<Note> = (0..5).map(note).collect();

        journal.append_events(&notes).unwrap();

        assert_eq!(journal.len(), 5);
        assert_eq!(journal.next_sequence(), 5);
        let replayed: Vec<Note> = journal.replay().unwrap();
        assert_eq!(replayed, notes);
    }

    #[test]
    fn test_batches_continue_sequence() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0), note(1)]).unwrap();
        journal.append_events(&[note(2)]).unwrap();

        let entries = journal.read_all().unwrap();
        let sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(entries[2].event_type, "Note");
        assert_eq!(entries[2].timestamp, 2_000);
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Undated {
        seq: u64,
    }

    impl Journaled for Undated {
        fn sequence(&self) -> u64 {
            self.seq
        }

        fn timestamp(&self) -> Option<i64> {
            None
        }

        fn event_type(&self) -> &'static str {
            "Undated"
        }
    }

    #[test]
    fn test_unrepresentable_timestamp_refused() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0)]).unwrap();
        let bytes_before = journal.byte_len();

        let result = journal.append_events(&[Undated { seq: 1 }]);

        assert_eq!(result, Err(JournalError::TimestampOutOfRange { sequence: 1 }));
        assert_eq!(journal.byte_len(), bytes_before);
        assert_eq!(journal.next_sequence(), 1);
    }

    #[test]
    fn test_sequence_gap_refuses_whole_batch() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0)]).unwrap();
        let bytes_before = journal.byte_len();

        let result = journal.append_events(&[note(1), note(3)]);

        assert_eq!(result, Err(JournalError::SequenceError { expected: 2, got: 3 }));
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.byte_len(), bytes_before);
        assert_eq!(journal.next_sequence(), 1);
    }

    #[test]
    fn test_duplicate_sequence_refused() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0), note(1)]).unwrap();

        let result = journal.append_events(&[note(1)]);
        assert_eq!(result, Err(JournalError::SequenceError { expected: 2, got: 1 }));
    }

    #[test]
    fn test_first_sequence_from_config() {
        let mut journal = EventJournal::new(JournalConfig {
            first_sequence: 10,
            max_entries: 0,
        });
        assert!(journal.append_events(&[note(0)]).is_err());
        journal.append_events(&[note(10), note(11)]).unwrap();
        assert_eq!(journal.replay::<Note>().unwrap().len(), 2);
    }

    #[test]
    fn test_size_limit() {
        let mut journal = EventJournal::new(JournalConfig {
            first_sequence: 0,
            max_entries: 2,
        });
        journal.append_events(&[note(0), note(1)]).unwrap();
        let result = journal.append_events(&[note(2)]);
        assert!(matches!(result, Err(JournalError::SizeLimitExceeded { limit: 2, .. })));
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0)]).unwrap();

        // Flip a byte inside the payload, before the trailing checksum
        let len = journal.byte_len();
        journal.bytes_mut()[len - 6] ^= 0xFF;

        let result = journal.read_all();
        assert!(matches!(result, Err(JournalError::ChecksumMismatch { sequence: 0, .. })));
    }

    #[test]
    fn test_truncated_journal_detected() {
        let mut journal = EventJournal::default();
        journal.append_events(&[note(0), note(1)]).unwrap();
        let len = journal.byte_len();
        journal.bytes_mut().truncate(len - 3);

        assert!(matches!(journal.read_all(), Err(JournalError::Corruption { .. })));
    }

    #[test]
    fn test_empty_journal_replays_nothing() {
        let journal = EventJournal::default();
        assert!(journal.is_empty());
        assert!(journal.replay::<Note>().unwrap().is_empty());
    }
}
