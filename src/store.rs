use crate::{Category, CategoryKind};

/// The four record categories of an editing session.
/// Owned by the session and passed by reference; single-threaded mutation.
#[derive(Debug, Clone)]
pub struct RecordStore {
    skill: Category,
    sequence: Category,
    effect: Category,
    condition: Category,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            skill: Category::new(CategoryKind::Skill),
            sequence: Category::new(CategoryKind::Sequence),
            effect: Category::new(CategoryKind::Effect),
            condition: Category::new(CategoryKind::Condition),
        }
    }

    pub fn category(&self, kind: CategoryKind) -> &Category {
        match kind {
            CategoryKind::Skill => &self.skill,
            CategoryKind::Sequence => &self.sequence,
            CategoryKind::Effect => &self.effect,
            CategoryKind::Condition => &self.condition,
        }
    }

    pub fn category_mut(&mut self, kind: CategoryKind) -> &mut Category {
        match kind {
            CategoryKind::Skill => &mut self.skill,
            CategoryKind::Sequence => &mut self.sequence,
            CategoryKind::Effect => &mut self.effect,
            CategoryKind::Condition => &mut self.condition,
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        CategoryKind::ALL.into_iter().map(|kind| self.category(kind))
    }

    pub fn total_records(&self) -> usize {
        self.categories().map(Category::len).sum()
    }
}
