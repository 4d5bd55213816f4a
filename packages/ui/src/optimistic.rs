//! Optimistic mutation state machines.
//!
//! Two small controllers, independent of any rendering framework so they
//! can be unit tested directly:
//!
//! - [`OptimisticToggle`] backs membership toggles (like/unlike,
//!   follow/unfollow). The flip is applied locally before the network
//!   round-trip and rolled back if the round-trip fails.
//! - [`PendingAppend`] backs comment submission. Nothing is inserted
//!   locally until the service confirms the row, so the rendered list
//!   only ever contains server-assigned records.
//!
//! Both controllers discard late completions. Each toggle carries a
//! monotonically increasing sequence number per entity: a completion
//! (success or failure) is only allowed to touch state while its ticket
//! is still the latest issued. Each append carries the generation of the
//! collection it was begun against: a reset starts a new generation, and
//! completions from the old one no longer apply.

/// Snapshot handed out by [`OptimisticToggle::begin`].
///
/// Carries the pre-flip state so a failed round-trip can restore it, the
/// sequence number that decides whether this attempt is still current,
/// and the membership the remote call should establish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleTicket {
    seq: u64,
    prior_active: bool,
    prior_count: i64,
    /// `true` means the remote side should insert the membership row,
    /// `false` means it should delete it.
    pub desired: bool,
}

/// One optimistic boolean plus its derived counter.
///
/// The UI reads `active()`/`count()` every render; the handlers drive the
/// lifecycle with `begin` -> remote call -> `settle` or `rollback`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimisticToggle {
    active: bool,
    count: i64,
    seq: u64,
}

impl OptimisticToggle {
    pub fn new(active: bool, count: i64) -> Self {
        Self {
            active,
            count,
            seq: 0,
        }
    }

    /// Current membership as the UI should render it.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Current counter as the UI should render it.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Flip membership now and return the ticket for the remote call.
    ///
    /// The counter moves by one in the direction of the flip. Repeated
    /// calls are allowed while earlier round-trips are still in flight;
    /// each call supersedes every ticket issued before it.
    pub fn begin(&mut self) -> ToggleTicket {
        let ticket = ToggleTicket {
            seq: self.seq + 1,
            prior_active: self.active,
            prior_count: self.count,
            desired: !self.active,
        };
        self.active = ticket.desired;
        self.count += if ticket.desired { 1 } else { -1 };
        self.seq = ticket.seq;
        ticket
    }

    /// Mark a successful round-trip.
    ///
    /// No state changes either way: the optimistic flip already matches
    /// the remote outcome. Returns `false` when the ticket was superseded,
    /// purely informational.
    pub fn settle(&self, ticket: &ToggleTicket) -> bool {
        ticket.seq == self.seq
    }

    /// Undo a failed round-trip.
    ///
    /// Restores the pre-flip snapshot only while the ticket is still the
    /// latest issued for this entity. A superseded ticket is discarded
    /// without touching state, and the caller should stay silent about it;
    /// the newer flip owns the entity now. Returns whether the rollback
    /// applied.
    pub fn rollback(&mut self, ticket: &ToggleTicket) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.active = ticket.prior_active;
        self.count = ticket.prior_count;
        true
    }

    /// Replace local state with a freshly fetched snapshot.
    ///
    /// Also invalidates every outstanding ticket, so completions from
    /// before the refetch can no longer apply.
    pub fn reconcile(&mut self, active: bool, count: i64) {
        self.active = active;
        self.count = count;
        self.seq += 1;
    }
}

/// Snapshot handed out by [`PendingAppend::try_begin`].
///
/// Carries the trimmed text to submit and the generation of the
/// collection the submission was begun against. [`PendingAppend::reset`]
/// starts a new generation, so a ticket minted before it can no longer
/// commit or abort anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendTicket {
    generation: u64,
    /// The trimmed text the remote call should submit.
    pub content: String,
}

/// An ordered collection that only grows by server-confirmed rows.
///
/// `try_begin` gates submission: one request in flight at a time, and
/// blank input never leaves the client. There is no placeholder row;
/// until `commit` the collection renders exactly as fetched.
#[derive(Clone, Debug, Default)]
pub struct PendingAppend<T> {
    rows: Vec<T>,
    in_flight: bool,
    generation: u64,
}

impl<T> PendingAppend<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            in_flight: false,
            generation: 0,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a submission is currently in flight (disables the control).
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a submission.
    ///
    /// Returns the ticket for the remote call, or `None` when the input
    /// is blank after trimming or another submission is already in
    /// flight. `None` means no remote call should be made and nothing
    /// changed.
    pub fn try_begin(&mut self, text: &str) -> Option<AppendTicket> {
        if self.in_flight {
            return None;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.in_flight = true;
        Some(AppendTicket {
            generation: self.generation,
            content: trimmed.to_string(),
        })
    }

    /// Append the server-confirmed row and release the gate.
    ///
    /// A ticket from before the last reset is discarded without touching
    /// the rows or the gate; the collection it was begun against is gone.
    /// Returns whether the row was appended.
    pub fn commit(&mut self, ticket: &AppendTicket, row: T) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.rows.push(row);
        self.in_flight = false;
        true
    }

    /// Release the gate after a failed submission, leaving rows
    /// untouched. Stale tickets are discarded the same way as in
    /// [`commit`](Self::commit). Returns whether the gate was released.
    pub fn abort(&mut self, ticket: &AppendTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Replace the collection after a full refetch.
    ///
    /// Starts a new generation, so completions begun against the
    /// previous collection can no longer apply.
    pub fn reset(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.in_flight = false;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership_and_counter() {
        let mut toggle = OptimisticToggle::new(false, 4);
        let ticket = toggle.begin();
        assert!(ticket.desired);
        assert!(toggle.active());
        assert_eq!(toggle.count(), 5);
    }

    #[test]
    fn toggle_from_present_decrements() {
        let mut toggle = OptimisticToggle::new(true, 7);
        let ticket = toggle.begin();
        assert!(!ticket.desired);
        assert!(!toggle.active());
        assert_eq!(toggle.count(), 6);
    }

    #[test]
    fn odd_toggles_end_present_even_toggles_end_absent() {
        let mut toggle = OptimisticToggle::new(false, 10);
        for n in 1..=8 {
            let ticket = toggle.begin();
            assert!(toggle.settle(&ticket));
            if n % 2 == 1 {
                assert!(toggle.active());
                assert_eq!(toggle.count(), 11);
            } else {
                assert!(!toggle.active());
                assert_eq!(toggle.count(), 10);
            }
        }
    }

    #[test]
    fn rollback_restores_pre_flip_snapshot() {
        let mut toggle = OptimisticToggle::new(false, 4);
        let ticket = toggle.begin();
        assert_eq!(toggle.count(), 5);
        assert!(toggle.rollback(&ticket));
        assert!(!toggle.active());
        assert_eq!(toggle.count(), 4);
    }

    #[test]
    fn superseded_rollback_is_discarded() {
        let mut toggle = OptimisticToggle::new(false, 0);
        let first = toggle.begin();
        let second = toggle.begin();
        // The older completion must not clobber the newer flip.
        assert!(!toggle.rollback(&first));
        assert!(!toggle.active());
        assert_eq!(toggle.count(), 0);
        // The latest ticket still owns the entity.
        assert!(toggle.rollback(&second));
        assert!(toggle.active());
        assert_eq!(toggle.count(), 1);
    }

    #[test]
    fn settle_reports_whether_ticket_is_latest() {
        let mut toggle = OptimisticToggle::new(false, 0);
        let first = toggle.begin();
        assert!(toggle.settle(&first));
        let second = toggle.begin();
        assert!(!toggle.settle(&first));
        assert!(toggle.settle(&second));
    }

    #[test]
    fn reconcile_overwrites_and_invalidates_tickets() {
        let mut toggle = OptimisticToggle::new(false, 2);
        let ticket = toggle.begin();
        toggle.reconcile(false, 9);
        assert!(!toggle.rollback(&ticket));
        assert!(!toggle.active());
        assert_eq!(toggle.count(), 9);
    }

    #[test]
    fn append_rejects_blank_input() {
        let mut pending: PendingAppend<String> = PendingAppend::new(vec![]);
        assert_eq!(pending.try_begin(""), None);
        assert_eq!(pending.try_begin("   \n\t"), None);
        assert!(!pending.in_flight());
        assert!(pending.is_empty());
    }

    #[test]
    fn append_trims_and_gates_while_in_flight() {
        let mut pending: PendingAppend<String> = PendingAppend::new(vec![]);
        let ticket = pending.try_begin("  hello there  ").unwrap();
        assert_eq!(ticket.content, "hello there");
        assert!(pending.in_flight());
        assert_eq!(pending.try_begin("another"), None);
    }

    #[test]
    fn commit_appends_confirmed_row_and_releases_gate() {
        let mut pending = PendingAppend::new(vec!["a".to_string(), "b".to_string()]);
        let ticket = pending.try_begin("c").unwrap();
        assert!(pending.commit(&ticket, "c-confirmed".to_string()));
        assert_eq!(pending.len(), 3);
        assert_eq!(pending.rows().last().map(String::as_str), Some("c-confirmed"));
        assert!(!pending.in_flight());
    }

    #[test]
    fn abort_leaves_rows_untouched() {
        let mut pending = PendingAppend::new(vec!["a".to_string()]);
        let ticket = pending.try_begin("b").unwrap();
        assert!(pending.abort(&ticket));
        assert_eq!(pending.rows(), ["a".to_string()]);
        assert!(!pending.in_flight());
        // The gate is open again for a resubmission.
        assert!(pending.try_begin("b").is_some());
    }

    #[test]
    fn reset_replaces_collection() {
        let mut pending = PendingAppend::new(vec![1, 2, 3]);
        pending.try_begin("x").unwrap();
        pending.reset(vec![7]);
        assert_eq!(pending.rows(), [7]);
        assert!(!pending.in_flight());
    }

    #[test]
    fn completions_from_before_reset_are_discarded() {
        let mut pending = PendingAppend::new(vec!["a".to_string()]);
        let stale = pending.try_begin("b").unwrap();
        // The thread switched while the submission was in flight.
        pending.reset(vec!["x".to_string()]);
        assert!(!pending.commit(&stale, "b-confirmed".to_string()));
        assert_eq!(pending.rows(), ["x".to_string()]);
        assert!(!pending.in_flight());
    }

    #[test]
    fn stale_abort_does_not_release_a_newer_gate() {
        let mut pending: PendingAppend<String> = PendingAppend::new(vec![]);
        let stale = pending.try_begin("a").unwrap();
        pending.reset(vec![]);
        let current = pending.try_begin("b").unwrap();
        assert!(!pending.abort(&stale));
        assert!(pending.in_flight());
        // The live submission still owns the gate.
        assert!(pending.commit(&current, "b-confirmed".to_string()));
        assert_eq!(pending.rows(), ["b-confirmed".to_string()]);
    }
}
