//! Two-phase optimistic updates.
//!
//! Console handlers show a mutation immediately, then confirm it against
//! the store. The pattern is explicit: apply the tentative value and hold
//! the inverse patch, then either commit (drop the patch) or revert
//! (replay it). No handler mutates state ad hoc and reconstructs the old
//! value after the fact.

/// Holds the inverse patch for one tentatively-applied value.
#[must_use = "dropping an OptimisticUpdate commits it; call revert() on failure"]
#[derive(Debug)]
pub struct OptimisticUpdate<T> {
    previous: T,
}

impl<T> OptimisticUpdate<T> {
    /// Swap `tentative` into `slot`, keeping the old value as the inverse
    /// patch.
    pub fn apply(slot: &mut T, tentative: T) -> Self {
        Self {
            previous: std::mem::replace(slot, tentative),
        }
    }

    /// The store confirmed the mutation; the inverse patch is discarded.
    pub fn commit(self) {}

    /// The store rejected the mutation; replay the inverse patch.
    pub fn revert(self, slot: &mut T) {
        *slot = self.previous;
    }

    /// Inspect the held previous value.
    pub const fn previous(&self) -> &T {
        &self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vox_core::OrgStatus;

    #[test]
    fn commit_keeps_the_tentative_value() {
        let mut status = OrgStatus::Active;
        let update = OptimisticUpdate::apply(&mut status, OrgStatus::Suspended);
        assert_eq!(status, OrgStatus::Suspended);
        update.commit();
        assert_eq!(status, OrgStatus::Suspended);
    }

    #[test]
    fn revert_replays_the_inverse_patch() {
        let mut status = OrgStatus::Active;
        let update = OptimisticUpdate::apply(&mut status, OrgStatus::Suspended);
        assert_eq!(update.previous(), &OrgStatus::Active);
        update.revert(&mut status);
        assert_eq!(status, OrgStatus::Active);
    }

    #[test]
    fn works_over_whole_entities() {
        let mut credits = 10.0_f64;
        let update = OptimisticUpdate::apply(&mut credits, 35.0);
        assert!((credits - 35.0).abs() < f64::EPSILON);
        update.revert(&mut credits);
        assert!((credits - 10.0).abs() < f64::EPSILON);
    }
}
