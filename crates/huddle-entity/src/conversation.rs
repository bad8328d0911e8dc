//! Conversation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Order two participant identifiers canonically.
///
/// The smaller ID always occupies the first slot, so one unordered
/// pair maps to exactly one (participant_1, participant_2) tuple
/// regardless of who initiates the chat. Uuid ordering is byte order,
/// which equals lexicographic order of the hyphenated lowercase form.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Which of the two participant slots a user occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantSlot {
    /// `participant_1_id` is the canonically smaller ID.
    First,
    /// `participant_2_id` is the canonically larger ID.
    Second,
}

/// The single persistent chat thread shared by exactly two users.
///
/// Invariant: `participant_1_id < participant_2_id`, and at most one
/// row exists per unordered pair (enforced by a unique index).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: Uuid,
    /// Canonically smaller participant ID.
    pub participant_1_id: Uuid,
    /// Canonically larger participant ID.
    pub participant_2_id: Uuid,
    /// When the most recent message was sent.
    pub last_message_at: Option<DateTime<Utc>>,
    /// Participant 1's read high-water mark.
    pub participant_1_last_read_at: Option<DateTime<Utc>>,
    /// Participant 2's read high-water mark.
    pub participant_2_last_read_at: Option<DateTime<Utc>>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Return which slot the given user occupies, if a participant.
    pub fn slot_of(&self, user_id: Uuid) -> Option<ParticipantSlot> {
        if user_id == self.participant_1_id {
            Some(ParticipantSlot::First)
        } else if user_id == self.participant_2_id {
            Some(ParticipantSlot::Second)
        } else {
            None
        }
    }

    /// Return the other participant's ID, if the given user is one.
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        match self.slot_of(user_id)? {
            ParticipantSlot::First => Some(self.participant_2_id),
            ParticipantSlot::Second => Some(self.participant_1_id),
        }
    }

    /// Check whether the given user is a participant.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.slot_of(user_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn test_canonical_pair_is_symmetric() {
        let (a, b) = (uuid(1), uuid(2));
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));
        assert_eq!(canonical_pair(a, b), (a, b));
    }

    #[test]
    fn test_slot_and_other_participant() {
        let conv = Conversation {
            id: uuid(9),
            participant_1_id: uuid(1),
            participant_2_id: uuid(2),
            last_message_at: None,
            participant_1_last_read_at: None,
            participant_2_last_read_at: None,
            created_at: Utc::now(),
        };

        assert_eq!(conv.slot_of(uuid(1)), Some(ParticipantSlot::First));
        assert_eq!(conv.slot_of(uuid(2)), Some(ParticipantSlot::Second));
        assert_eq!(conv.slot_of(uuid(3)), None);
        assert_eq!(conv.other_participant(uuid(1)), Some(uuid(2)));
        assert_eq!(conv.other_participant(uuid(3)), None);
    }
}
