use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::{Board, Label, Outcome};

/// Something that wants to follow a game, e.g. a display.
///
/// Subscribers get read-only views of the board and are called in the order
/// they subscribed.
pub trait Subscriber {
    /// Called once, before the first move is requested.
    fn on_game_start(&mut self, board: &Board) -> anyhow::Result<()>;

    /// Called after every accepted move, with the board already updated.
    fn on_board_updated(
        &mut self,
        board: &Board,
        label: Label,
        column: usize,
    ) -> anyhow::Result<()>;

    /// Called exactly once, when the game is won or drawn.
    fn on_game_result(&mut self, outcome: Outcome) -> anyhow::Result<()>;
}

/// The ordered list of subscribers of one game.
///
/// Only weak references are kept: whoever subscribes something stays
/// responsible for keeping it alive. Subscribers that have been dropped are
/// skipped.
#[derive(Default)]
pub struct Subscribers {
    list: Vec<Weak<RefCell<dyn Subscriber>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber at the end of the list.
    ///
    /// Returns `false` without doing anything if this very instance is
    /// already subscribed.
    pub fn insert<S: Subscriber + 'static>(&mut self, subscriber: &Rc<RefCell<S>>) -> bool {
        self.list.retain(|weak| weak.strong_count() > 0);
        let ptr = Rc::as_ptr(subscriber) as *const ();
        if self
            .list
            .iter()
            .any(|weak| Weak::as_ptr(weak) as *const () == ptr)
        {
            return false;
        }
        let weak = Rc::downgrade(subscriber);
        let weak: Weak<RefCell<dyn Subscriber>> = weak;
        self.list.push(weak);
        true
    }

    /// Number of subscribers that are still alive.
    pub fn len(&self) -> usize {
        self.list
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `notify` on every live subscriber, in subscription order.
    ///
    /// Stops at the first subscriber that returns an error.
    pub fn broadcast<F>(&self, mut notify: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut dyn Subscriber) -> anyhow::Result<()>,
    {
        for (idx, weak) in self.list.iter().enumerate() {
            let Some(subscriber) = weak.upgrade() else {
                trace!(idx, "Skipping dropped subscriber");
                continue;
            };
            let mut subscriber = subscriber.try_borrow_mut()?;
            notify(&mut *subscriber)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts: usize,
    }

    impl Subscriber for Counter {
        fn on_game_start(&mut self, _board: &Board) -> anyhow::Result<()> {
            self.starts += 1;
            Ok(())
        }

        fn on_board_updated(&mut self, _: &Board, _: Label, _: usize) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_game_result(&mut self, _outcome: Outcome) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn same_instance_is_only_added_once() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let other = Rc::new(RefCell::new(Counter::default()));
        let mut subscribers = Subscribers::new();
        assert!(subscribers.insert(&counter));
        assert!(!subscribers.insert(&counter));
        assert!(!subscribers.insert(&Rc::clone(&counter)));
        assert!(subscribers.insert(&other));
        assert_eq!(subscribers.len(), 2);

        let board = Board::new();
        subscribers
            .broadcast(|s| s.on_game_start(&board))
            .unwrap();
        assert_eq!(counter.borrow().starts, 1);
        assert_eq!(other.borrow().starts, 1);
    }

    struct Silent;

    impl Subscriber for Silent {
        fn on_game_start(&mut self, _board: &Board) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_board_updated(&mut self, _: &Board, _: Label, _: usize) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_game_result(&mut self, _outcome: Outcome) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn different_subscriber_types_share_one_list() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let silent = Rc::new(RefCell::new(Silent));
        let mut subscribers = Subscribers::new();
        assert!(subscribers.insert(&silent));
        assert!(subscribers.insert(&counter));
        assert!(!subscribers.insert(&silent));
        assert_eq!(subscribers.len(), 2);

        let board = Board::new();
        subscribers
            .broadcast(|s| s.on_game_start(&board))
            .unwrap();
        assert_eq!(counter.borrow().starts, 1);
    }

    #[test]
    fn dropped_subscribers_are_skipped() {
        let kept = Rc::new(RefCell::new(Counter::default()));
        let mut subscribers = Subscribers::new();
        {
            let dropped = Rc::new(RefCell::new(Counter::default()));
            subscribers.insert(&dropped);
        }
        subscribers.insert(&kept);
        assert_eq!(subscribers.len(), 1);

        let board = Board::new();
        subscribers
            .broadcast(|s| s.on_game_start(&board))
            .unwrap();
        assert_eq!(kept.borrow().starts, 1);
    }
}
