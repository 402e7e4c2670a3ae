use crate::goal::types::GoalId;

/// Goals on the active downward recursion path of one top-level evaluation.
///
/// Entries are pushed when a goal starts resolving its dependencies and popped
/// when it finishes, so two siblings sharing a dependency each traverse it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitPath {
    path: Vec<GoalId>,
}

impl VisitPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: GoalId) -> bool {
        self.path.contains(&id)
    }

    pub fn enter(&mut self, id: GoalId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.path.push(id);
        true
    }

    pub fn leave(&mut self, id: GoalId) {
        if self.path.last() == Some(&id) {
            self.path.pop();
        } else if let Some(position) = self.path.iter().rposition(|entry| *entry == id) {
            self.path.truncate(position);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn as_slice(&self) -> &[GoalId] {
        &self.path
    }
}
