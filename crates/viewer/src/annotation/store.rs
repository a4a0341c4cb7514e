use shared::{Annotation, AnnotationId, Point3};
use tracing::debug;

/// Result of committing text to an annotation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextCommit {
    /// Text saved; carries the trimmed value
    Updated(String),
    /// Empty text removed the annotation
    Deleted,
    /// No annotation with that id
    Unknown,
}

/// In-memory annotations in creation order, with at most one being edited.
#[derive(Debug)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    editing: Option<AnnotationId>,
    next_id: u64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self {
            annotations: Vec::new(),
            editing: None,
            next_id: 1,
        }
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty annotation at `anchor` and give it editing focus.
    /// Returns `None` while another annotation is being edited.
    pub fn create(&mut self, anchor: Point3) -> Option<&Annotation> {
        if self.editing.is_some() {
            debug!("create refused: {:?} is being edited", self.editing);
            return None;
        }

        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        self.annotations.push(Annotation::new(id, anchor));
        self.editing = Some(id);
        self.check_invariants();
        self.annotations.last()
    }

    /// Commit text. Surrounding whitespace is trimmed; empty text deletes.
    /// Editing focus is cleared either way.
    pub fn set_text(&mut self, id: AnnotationId, text: &str) -> TextCommit {
        if self.editing == Some(id) {
            self.editing = None;
        }

        let trimmed = text.trim();
        let result = if trimmed.is_empty() {
            if self.remove(id) {
                TextCommit::Deleted
            } else {
                TextCommit::Unknown
            }
        } else {
            match self.annotations.iter_mut().find(|a| a.id == id) {
                Some(a) => {
                    a.text = trimmed.to_string();
                    TextCommit::Updated(a.text.clone())
                }
                None => TextCommit::Unknown,
            }
        };
        self.check_invariants();
        result
    }

    /// Remove an annotation. Returns whether anything was removed; unknown ids are a no-op.
    pub fn delete(&mut self, id: AnnotationId) -> bool {
        let removed = self.remove(id);
        self.check_invariants();
        removed
    }

    fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.annotations.len() != before
    }

    /// Snapshot in creation order
    pub fn list(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn editing(&self) -> Option<AnnotationId> {
        self.editing
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Drop everything. The id counter keeps running so ids are never reused.
    pub fn clear(&mut self) {
        self.annotations.clear();
        self.editing = None;
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.annotations
                .windows(2)
                .all(|w| w[0].id < w[1].id),
            "ids must be unique and increasing"
        );
        debug_assert!(
            self.editing.is_none_or(|id| self.get(id).is_some()),
            "editing focus must refer to a stored annotation"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_focus_and_offsets() {
        let mut store = AnnotationStore::new();
        let a = store.create([0.0, 0.0, 0.0]).unwrap().clone();
        assert_eq!(a.id, AnnotationId(1));
        assert!(a.text.is_empty());
        assert_eq!(a.leader_end, [1.5, 1.0, 0.0]);
        assert_eq!(store.editing(), Some(a.id));
    }

    #[test]
    fn test_create_refused_while_editing() {
        let mut store = AnnotationStore::new();
        store.create([0.0; 3]).unwrap();
        assert!(store.create([1.0; 3]).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_text_commits_and_clears_focus() {
        let mut store = AnnotationStore::new();
        let id = store.create([0.0; 3]).unwrap().id;
        assert_eq!(store.set_text(id, "  Femur "), TextCommit::Updated("Femur".into()));
        assert_eq!(store.get(id).unwrap().text, "Femur");
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_empty_or_whitespace_commit_deletes() {
        let mut store = AnnotationStore::new();
        let id = store.create([0.0; 3]).unwrap().id;
        assert_eq!(store.set_text(id, "   "), TextCommit::Deleted);
        assert!(store.is_empty());
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn test_set_text_unknown_id() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.set_text(AnnotationId(9), "Ulna"), TextCommit::Unknown);
        assert_eq!(store.set_text(AnnotationId(9), ""), TextCommit::Unknown);
    }

    #[test]
    fn test_delete_idempotent() {
        let mut store = AnnotationStore::new();
        let id = store.create([0.0; 3]).unwrap().id;
        store.set_text(id, "Tibia");
        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(!store.delete(AnnotationId(1000)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_editing_releases_focus() {
        let mut store = AnnotationStore::new();
        let id = store.create([0.0; 3]).unwrap().id;
        store.delete(id);
        assert_eq!(store.editing(), None);
        assert!(store.create([0.0; 3]).is_some());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = AnnotationStore::new();
        let first = store.create([0.0; 3]).unwrap().id;
        store.delete(first);
        store.clear();
        let second = store.create([0.0; 3]).unwrap().id;
        assert!(second > first);
    }

    #[test]
    fn test_list_in_creation_order() {
        let mut store = AnnotationStore::new();
        for name in ["Radius", "Ulna", "Scapula"] {
            let id = store.create([0.0; 3]).unwrap().id;
            store.set_text(id, name);
        }
        let names: Vec<_> = store.list().iter().map(|a| a.text.as_str()).collect();
        assert_eq!(names, ["Radius", "Ulna", "Scapula"]);
    }
}
