/// Snowflake ID Generation
///
/// Produces compact, time-ordered, collision-resistant string identifiers
/// used both as refresh-token ids and as general-purpose primary keys.
/// Layout: 41 bits of milliseconds since the service epoch, 10 bits of
/// worker id, 12 bits of per-millisecond sequence, rendered as a
/// fixed-width base-36 string so lexicographic order matches numeric order.

use std::sync::Mutex;

use crate::error::IdError;

/// Service epoch: 2010-12-01T00:00:00+08:00 in unix milliseconds.
/// Subtracted before encoding to extend the range of the 41-bit field.
const EPOCH_MS: u64 = 1_291_132_800_000;

const WORKER_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;
const MAX_WORKER_ID: u64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// 36^13 > u64::MAX, so 13 base-36 digits hold any id.
const ID_WIDTH: usize = 13;

struct GeneratorState {
    last_timestamp_ms: u64,
    sequence: u64,
}

/// Process-wide generator with a mutex-guarded timestamp/sequence pair.
///
/// Construct once and share (`Arc`) across threads; every call either
/// returns a fresh identifier or an error, never a duplicate.
pub struct SnowflakeGenerator {
    worker_id: u64,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator {
    /// Create a generator for the given worker id.
    ///
    /// # Errors
    /// Returns an error if the worker id does not fit its 10-bit field.
    pub fn new(worker_id: u64) -> Result<Self, IdError> {
        if worker_id > MAX_WORKER_ID {
            return Err(IdError::WorkerIdOutOfRange(worker_id));
        }
        Ok(Self {
            worker_id,
            state: Mutex::new(GeneratorState {
                last_timestamp_ms: 0,
                sequence: 0,
            }),
        })
    }

    /// Generate the next identifier.
    ///
    /// Calls within the same millisecond increment the sequence; when the
    /// sequence overflows, the call spins until the next millisecond (a
    /// bounded wait of at most 1ms). A wall clock behind the last observed
    /// timestamp fails fast with `IdError::ClockRegression`; the regressed
    /// interval is never reused.
    pub fn next_id(&self) -> Result<String, IdError> {
        let mut state = self.state.lock().unwrap();
        let mut now = current_millis();

        if now < state.last_timestamp_ms {
            tracing::warn!(
                last_ms = state.last_timestamp_ms,
                now_ms = now,
                "system clock moved backwards, refusing to generate id"
            );
            return Err(IdError::ClockRegression {
                last_ms: state.last_timestamp_ms,
                now_ms: now,
            });
        }

        if now == state.last_timestamp_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond.
                while now <= state.last_timestamp_ms {
                    now = current_millis();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp_ms = now;

        let id = ((now - EPOCH_MS) << (WORKER_BITS + SEQUENCE_BITS))
            | (self.worker_id << SEQUENCE_BITS)
            | state.sequence;

        Ok(encode_base36(id))
    }
}

fn current_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

fn encode_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = [b'0'; ID_WIDTH];
    let mut i = ID_WIDTH;
    while value > 0 {
        i -= 1;
        buf[i] = DIGITS[(value % 36) as usize];
        value /= 36;
    }
    buf.iter().map(|&b| b as char).collect()
}
