//! FIFO queue of pending draw work.

use std::collections::VecDeque;

use crate::action::Action;
use crate::{Hsv, SketchError, SketchResult};

/// Colour used when an entry is enqueued without one (`#ffffff`).
pub const DEFAULT_COLOUR: Hsv = Hsv::WHITE;

/// One pending draw: an action and the colour it paints in.
#[derive(Debug)]
pub struct QueueEntry {
    /// The action to run.
    pub action: Box<dyn Action>,
    /// The colour handed to the action.
    pub colour: Hsv,
}

/// Strict FIFO of [`QueueEntry`] values.
///
/// Entries are drained in enqueue order; nothing reorders, drops or
/// deduplicates them.
#[derive(Debug, Default)]
pub struct DrawQueue {
    entries: VecDeque<QueueEntry>,
}

impl DrawQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn enqueue(&mut self, action: Box<dyn Action>, colour: Hsv) {
        self.entries.push_back(QueueEntry { action, colour });
    }

    /// Append an action that may be missing, defaulting the colour to white.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MissingAction`] if `action` is `None`; the queue
    /// is left unchanged.
    pub fn try_enqueue(
        &mut self,
        action: Option<Box<dyn Action>>,
        colour: Option<Hsv>,
    ) -> SketchResult<()> {
        let action = action.ok_or(SketchError::MissingAction)?;
        self.enqueue(action, colour.unwrap_or(DEFAULT_COLOUR));
        Ok(())
    }

    /// Remove and return the head entry.
    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending entries, head first.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Compositing, DrawContext};
    use crate::ActionError;

    #[derive(Debug)]
    struct Tagged(usize);

    impl Action for Tagged {
        fn draw(
            &self,
            _ctx: &mut dyn DrawContext,
            _colour: Hsv,
            _surfaces: &mut Compositing<'_>,
        ) -> Result<(), ActionError> {
            Ok(())
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = DrawQueue::new();
        for i in 0..5 {
            queue.enqueue(Box::new(Tagged(i)), Hsv::BLACK);
        }
        let mut seen = Vec::new();
        while let Some(entry) = queue.pop() {
            seen.push(format!("{:?}", entry.action));
        }
        let expected: Vec<String> = (0..5).map(|i| format!("{:?}", Tagged(i))).collect();
        assert_eq!(seen, expected);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_missing_action_rejected() {
        let mut queue = DrawQueue::new();
        let result = queue.try_enqueue(None, Some(Hsv::BLACK));
        assert!(matches!(result, Err(SketchError::MissingAction)));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_default_colour_is_white() {
        let mut queue = DrawQueue::new();
        queue
            .try_enqueue(Some(Box::new(Tagged(0))), None)
            .expect("enqueue");
        let entry = queue.pop().expect("entry");
        assert_eq!(entry.colour, "#ffffff".parse::<Hsv>().expect("hex"));
    }
}
