//! Input module - keyboard state and user feedback at invocation time

mod feedback;
mod modifiers;

pub use feedback::{Feedback, SilentFeedback, SystemBeep};
pub use modifiers::{FixedModifiers, ModifierKeys, SystemModifiers};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingFeedback(Cell<u32>);

    impl Feedback for CountingFeedback {
        fn confirm(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_fixed_modifiers() {
        assert!(FixedModifiers(true).override_held());
        assert!(!FixedModifiers(false).override_held());
    }

    #[test]
    fn test_feedback_through_reference() {
        let counter = CountingFeedback(Cell::new(0));
        let sink: &dyn Feedback = &counter;
        sink.confirm();
        sink.confirm();
        assert_eq!(counter.0.get(), 2);
        SilentFeedback.confirm();
    }
}
