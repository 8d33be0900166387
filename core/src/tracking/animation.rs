use crate::game_data::NO_ANIMATION;

/// Most animations kept per instance. Only the tail is ever read.
const MAX_BUFFERED_ANIMATIONS: usize = 16;

/// Distinct animations seen on an engaged instance, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationBuffer {
    ids: Vec<i32>,
}

impl AnimationBuffer {
    /// Record an animation. Idle and immediate repeats are skipped.
    /// Returns true if the id was buffered.
    pub fn push(&mut self, animation_id: i32) -> bool {
        if animation_id == NO_ANIMATION || self.ids.last() == Some(&animation_id) {
            return false;
        }
        if self.ids.len() == MAX_BUFFERED_ANIMATIONS {
            self.ids.remove(0);
        }
        self.ids.push(animation_id);
        true
    }

    /// Death-animation candidate
    pub fn last(&self) -> Option<i32> {
        self.ids.last().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_idle_and_repeats() {
        let mut buffer = AnimationBuffer::default();
        assert!(buffer.push(422));
        assert!(!buffer.push(422));
        assert!(!buffer.push(NO_ANIMATION));
        assert!(buffer.push(423));
        assert!(buffer.push(422));

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.last(), Some(422));
    }

    #[test]
    fn bounded() {
        let mut buffer = AnimationBuffer::default();
        for id in 0..40 {
            buffer.push(id);
        }
        assert_eq!(buffer.len(), MAX_BUFFERED_ANIMATIONS);
        assert_eq!(buffer.last(), Some(39));
    }
}
