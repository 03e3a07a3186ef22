//! Local set of labels, kept in step with the server.

use std::sync::Arc;

use crate::error::SyncResult;
use crate::gateway::SyncGateway;
use crate::sequence::SequencedState;
use crate::types::{Label, LabelId, NewLabelPayload};

/// Flip `target`'s membership in `selection`.
///
/// Removes it if a label with the same id is present, otherwise appends it. Untouched labels
/// keep their relative order. Used for both the new-todo form and editing an existing todo.
pub fn toggle(selection: &[Label], target: &Label) -> Vec<Label> {
    if selection.iter().any(|label| label.id == target.id) {
        selection
            .iter()
            .filter(|label| label.id != target.id)
            .cloned()
            .collect()
    } else {
        let mut toggled = selection.to_vec();
        toggled.push(target.clone());
        toggled
    }
}

pub struct LabelSet {
    gateway: Arc<dyn SyncGateway>,
    state: SequencedState<Vec<Label>>,
}

impl LabelSet {
    pub fn new(gateway: Arc<dyn SyncGateway>) -> Self {
        Self {
            gateway,
            state: SequencedState::default(),
        }
    }

    /// Fetch all labels and replace the local set.
    pub async fn load(&self) -> SyncResult<Vec<Label>> {
        let ticket = self.state.issue();
        let labels = self.gateway.list_labels().await?;
        tracing::debug!("Loaded {} labels", labels.len());
        self.state.replace(ticket, labels);
        Ok(self.state.snapshot())
    }

    /// Create a label unless one with the same name already exists locally.
    ///
    /// The name check is local only; two clients can still create the same name.
    pub async fn add(&self, payload: NewLabelPayload) -> SyncResult<Label> {
        if let Some(existing) = self.find_by_name(&payload.name) {
            tracing::debug!("Label '{}' already exists as {}", existing.name, existing.id);
            return Ok(existing);
        }

        let label = self.gateway.create_label(&payload).await?;
        let ticket = self.state.issue();
        let created = label.clone();
        self.state.modify(ticket, move |labels| {
            if !labels.iter().any(|l| l.id == created.id) {
                labels.push(created);
            }
        });
        Ok(label)
    }

    /// Delete a label remotely, then drop it locally.
    ///
    /// Todos that embed the label keep it until the next todo reload.
    pub async fn remove(&self, id: LabelId) -> SyncResult<()> {
        self.gateway.delete_label(id).await?;
        let ticket = self.state.issue();
        self.state
            .modify(ticket, |labels| labels.retain(|label| label.id != id));
        Ok(())
    }

    pub fn labels(&self) -> Vec<Label> {
        self.state.snapshot()
    }

    pub fn get(&self, id: LabelId) -> Option<Label> {
        self.state
            .read(|labels| labels.iter().find(|label| label.id == id).cloned())
    }

    pub fn find_by_name(&self, name: &str) -> Option<Label> {
        self.state
            .read(|labels| labels.iter().find(|label| label.name == name).cloned())
    }

    pub fn contains(&self, id: LabelId) -> bool {
        self.state
            .read(|labels| labels.iter().any(|label| label.id == id))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::error::Operation;
    use crate::memory::MemoryGateway;
    use proptest::prelude::*;

    fn label(id: LabelId, name: &str) -> Label {
        Label {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn toggle_appends_missing_label() {
        let selection = vec![label(1, "work")];
        let toggled = toggle(&selection, &label(2, "home"));
        assert_eq!(toggled, vec![label(1, "work"), label(2, "home")]);
    }

    #[test]
    fn toggle_removes_present_label_by_id() {
        let selection = vec![label(1, "work"), label(2, "home"), label(3, "gym")];
        // same id, different name still counts as present
        let toggled = toggle(&selection, &label(2, "renamed"));
        assert_eq!(toggled, vec![label(1, "work"), label(3, "gym")]);
    }

    fn arb_selection() -> impl Strategy<Value = Vec<Label>> {
        proptest::collection::btree_set(0..50i32, 0..10).prop_map(|ids| {
            ids.into_iter()
                .map(|id| label(id, &format!("label-{}", id)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_identity(selection in arb_selection(), id in 0..50i32) {
            let target = label(id, &format!("label-{}", id));
            let once = toggle(&selection, &target);
            let twice = toggle(&once, &target);
            prop_assert_eq!(twice, selection);
        }

        #[test]
        fn prop_toggle_preserves_order_of_others(selection in arb_selection(), id in 0..50i32) {
            let target = label(id, &format!("label-{}", id));
            let others: Vec<_> = selection.iter().filter(|l| l.id != id).cloned().collect();
            let toggled: Vec<_> = toggle(&selection, &target)
                .into_iter()
                .filter(|l| l.id != id)
                .collect();
            prop_assert_eq!(toggled, others);
        }
    }

    #[tokio::test]
    async fn add_appends_server_label() {
        let gateway = Arc::new(MemoryGateway::new());
        let set = LabelSet::new(gateway.clone());

        let created = set.add(NewLabelPayload::new("work")).await.unwrap();

        assert_eq!(created, label(1, "work"));
        assert_eq!(set.labels(), vec![label(1, "work")]);
        assert_eq!(gateway.calls(Operation::CreateLabel), 1);
    }

    #[tokio::test]
    async fn add_existing_name_makes_no_remote_call() {
        let gateway = Arc::new(MemoryGateway::new());
        let set = LabelSet::new(gateway.clone());
        set.add(NewLabelPayload::new("work")).await.unwrap();
        let before = set.labels();

        let existing = set.add(NewLabelPayload::new("work")).await.unwrap();

        assert_eq!(existing, label(1, "work"));
        assert_eq!(set.labels(), before);
        assert_eq!(gateway.calls(Operation::CreateLabel), 1);
    }

    #[tokio::test]
    async fn failed_add_leaves_set_unchanged() {
        let gateway = Arc::new(MemoryGateway::new());
        let set = LabelSet::new(gateway.clone());
        set.add(NewLabelPayload::new("work")).await.unwrap();
        gateway.fail_next(Operation::CreateLabel);

        let err = set.add(NewLabelPayload::new("home")).await.unwrap_err();

        assert_eq!(err.operation(), Operation::CreateLabel);
        assert_eq!(set.labels(), vec![label(1, "work")]);
    }

    #[tokio::test]
    async fn remove_drops_label_locally() {
        let gateway = Arc::new(MemoryGateway::new());
        let set = LabelSet::new(gateway.clone());
        set.add(NewLabelPayload::new("work")).await.unwrap();
        set.add(NewLabelPayload::new("home")).await.unwrap();

        set.remove(1).await.unwrap();

        assert_eq!(set.labels(), vec![label(2, "home")]);
        assert!(!set.contains(1));
    }

    #[tokio::test]
    async fn failed_remove_keeps_label() {
        let gateway = Arc::new(MemoryGateway::new());
        let set = LabelSet::new(gateway.clone());
        set.add(NewLabelPayload::new("work")).await.unwrap();
        gateway.fail_next(Operation::DeleteLabel);

        assert!(set.remove(1).await.is_err());
        assert!(set.contains(1));
    }

    #[tokio::test]
    async fn load_replaces_wholesale() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed_label("work");
        gateway.seed_label("home");
        let set = LabelSet::new(gateway.clone());

        let loaded = set.load().await.unwrap();

        assert_eq!(loaded, vec![label(1, "work"), label(2, "home")]);
        assert_eq!(set.find_by_name("home"), Some(label(2, "home")));
        assert_eq!(set.get(1), Some(label(1, "work")));
    }
}
