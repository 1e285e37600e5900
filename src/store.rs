use tracing::{debug, warn};

use crate::ids::{generate_id, IdStrategy};
use crate::models::{
    decode_items, encode_items, finite, non_blank, non_negative, positive, ExerciseItem,
    ExercisePatch, Item, NewExercise, NewItem, SectionItem, LOCAL_STORAGE_KEY,
};
use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

/// Owns the ordered item list and writes the whole list back to storage
/// after every change. Mutators return whether the list changed.
pub struct ListStore<S> {
    items: Vec<Item>,
    storage: S,
    id_strategy: IdStrategy,
}

impl<S: KeyValueStore> ListStore<S> {
    /// Reads the persisted list. Never fails: unreadable state starts empty.
    pub fn load(storage: S, id_strategy: IdStrategy) -> Self {
        let items = match storage.get(LOCAL_STORAGE_KEY) {
            Ok(Some(raw)) => decode_items(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("could not read saved list, starting empty: {}", e);
                Vec::new()
            }
        };
        debug!("loaded {} items", items.len());
        Self {
            items,
            storage,
            id_strategy,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn add(&mut self, payload: NewItem) -> bool {
        let item = match payload {
            NewItem::Section { title } => {
                let title = title.trim();
                if title.is_empty() {
                    return false;
                }
                Item::Section(SectionItem {
                    id: self.next_id(),
                    title: title.to_string(),
                })
            }
            NewItem::Exercise(new) => match self.exercise_from(new) {
                Some(exercise) => Item::Exercise(exercise),
                None => return false,
            },
        };
        debug!("adding item {}", item.id());
        self.items.push(item);
        self.persist();
        true
    }

    fn exercise_from(&self, new: NewExercise) -> Option<ExerciseItem> {
        let exercise = new.exercise.trim().to_string();
        let reps = non_blank(new.reps.map(|r| r.trim().to_string()));
        let rest_sec = non_negative(new.rest_sec);
        if exercise.is_empty() && reps.is_none() && rest_sec.is_none() {
            return None;
        }
        Some(ExerciseItem {
            id: self.next_id(),
            exercise,
            series: positive(new.series),
            reps,
            weight: finite(new.weight),
            rest_sec,
        })
    }

    /// Patches an exercise in place. Sections and unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: ExercisePatch) -> bool {
        let Some(Item::Exercise(exercise)) = self.items.iter_mut().find(|item| item.id() == id)
        else {
            return false;
        };
        let before = exercise.clone();
        if let Some(text) = patch.exercise {
            exercise.exercise = text;
        }
        if let Some(series) = patch.series {
            exercise.series = positive(series);
        }
        if let Some(reps) = patch.reps {
            exercise.reps = non_blank(reps);
        }
        if let Some(weight) = patch.weight {
            exercise.weight = finite(weight);
        }
        if let Some(rest_sec) = patch.rest_sec {
            exercise.rest_sec = non_negative(rest_sec);
        }
        if *exercise == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.items.remove(index);
        self.persist();
        true
    }

    /// Always writes, so the persisted copy ends up empty even if an
    /// earlier write was lost.
    pub fn clear_all(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.persist();
        had_items
    }

    pub fn duplicate_last(&mut self) -> bool {
        let Some(last) = self.items.last() else {
            return false;
        };
        let copy = last.with_id(self.next_id());
        self.items.push(copy);
        self.persist();
        true
    }

    pub fn move_item(&mut self, id: &str, direction: Direction) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let last = self.items.len() - 1;
        let to = match direction {
            Direction::Up => from.saturating_sub(1),
            Direction::Down => (from + 1).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
        if from == to {
            return false;
        }
        match direction {
            Direction::Up | Direction::Down => self.items.swap(from, to),
            Direction::Top | Direction::Bottom => {
                let item = self.items.remove(from);
                self.items.insert(to, item);
            }
        }
        self.persist();
        true
    }

    pub fn insert_section_above(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let section = Item::Section(SectionItem {
            id: self.next_id(),
            title: title.to_string(),
        });
        self.items.insert(index, section);
        self.persist();
        true
    }

    /// Replaces the list with a caller-supplied ordering. Membership and
    /// duplicates are not checked.
    pub fn reorder(&mut self, items: Vec<Item>) -> bool {
        if items == self.items {
            return false;
        }
        self.items = items;
        self.persist();
        true
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn next_id(&self) -> String {
        generate_id(self.id_strategy)
    }

    fn persist(&mut self) {
        let encoded = match encode_items(&self.items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("could not encode list: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(LOCAL_STORAGE_KEY, &encoded) {
            warn!("list not saved: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::collections::HashSet;

    fn empty_store() -> ListStore<MemoryStore> {
        ListStore::load(MemoryStore::default(), IdStrategy::Uuid)
    }

    fn exercise(name: &str) -> NewItem {
        NewItem::Exercise(NewExercise {
            exercise: name.into(),
            ..Default::default()
        })
    }

    fn section(title: &str) -> NewItem {
        NewItem::Section {
            title: title.into(),
        }
    }

    fn ids<S: KeyValueStore>(store: &ListStore<S>) -> Vec<String> {
        store.items().iter().map(|i| i.id().to_string()).collect()
    }

    fn names<S: KeyValueStore>(store: &ListStore<S>) -> Vec<String> {
        store
            .items()
            .iter()
            .map(|item| match item {
                Item::Exercise(ex) => ex.exercise.clone(),
                Item::Section(sec) => format!("#{}", sec.title),
            })
            .collect()
    }

    fn store_with(list: &[&str]) -> ListStore<MemoryStore> {
        let mut store = empty_store();
        for name in list {
            assert!(store.add(exercise(name)));
        }
        store
    }

    fn reload(store: &ListStore<MemoryStore>) -> ListStore<MemoryStore> {
        ListStore::load(store.storage().clone(), IdStrategy::Uuid)
    }

    fn squat_store() -> ListStore<MemoryStore> {
        let raw = r#"[{"type":"exercise","id":"a","exercise":"Squat","series":5,"reps":"5"}]"#;
        ListStore::load(
            MemoryStore::with_value(LOCAL_STORAGE_KEY, raw),
            IdStrategy::Uuid,
        )
    }

    #[test]
    fn add_appends_with_unique_id() {
        let mut store = store_with(&["Squat", "Bench"]);
        assert!(store.add(NewItem::Exercise(NewExercise {
            reps: Some("AMRAP".into()),
            ..Default::default()
        })));
        assert_eq!(store.len(), 3);
        assert_eq!(names(&store), vec!["Squat", "Bench", ""]);
        let unique: HashSet<String> = ids(&store).into_iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn add_accepts_rest_alone() {
        let mut store = empty_store();
        assert!(store.add(NewItem::Exercise(NewExercise {
            rest_sec: Some(0.0),
            ..Default::default()
        })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_exercise_without_name_reps_or_rest() {
        let mut store = store_with(&["Squat"]);
        let before = store.items().to_vec();
        let rejected = NewItem::Exercise(NewExercise {
            exercise: "   ".into(),
            series: Some(3),
            reps: Some(" ".into()),
            weight: Some(40.0),
            rest_sec: None,
        });
        assert!(!store.add(rejected));
        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn add_trims_and_normalizes_fields() {
        let mut store = empty_store();
        store.add(NewItem::Exercise(NewExercise {
            exercise: "  Deadlift ".into(),
            series: Some(0),
            reps: Some(" 5 ".into()),
            weight: Some(f64::NAN),
            rest_sec: Some(f64::INFINITY),
        }));
        match &store.items()[0] {
            Item::Exercise(ex) => {
                assert_eq!(ex.exercise, "Deadlift");
                assert_eq!(ex.series, None);
                assert_eq!(ex.reps.as_deref(), Some("5"));
                assert_eq!(ex.weight, None);
                assert_eq!(ex.rest_sec, None);
            }
            other => panic!("expected exercise, got {:?}", other),
        }
    }

    #[test]
    fn blank_section_title_is_rejected() {
        let mut store = store_with(&["Squat"]);
        assert!(!store.add(section("  ")));
        assert_eq!(store.len(), 1);
        assert!(store.add(section(" Warm-up ")));
        assert_eq!(names(&store), vec!["Squat", "#Warm-up"]);
    }

    #[test]
    fn update_patches_only_named_fields() {
        let mut store = squat_store();
        assert!(store.update("a", ExercisePatch::weight(Some(100.0))));
        match store.get("a") {
            Some(Item::Exercise(ex)) => {
                assert_eq!(ex.weight, Some(100.0));
                assert_eq!(ex.series, Some(5));
                assert_eq!(ex.reps.as_deref(), Some("5"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn update_with_unparsed_number_clears_the_field() {
        let mut store = squat_store();
        store.update("a", ExercisePatch::weight(Some(80.0)));
        assert!(store.update("a", ExercisePatch::weight(None)));
        match store.get("a") {
            Some(Item::Exercise(ex)) => assert_eq!(ex.weight, None),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!reload(&store).storage().entries[LOCAL_STORAGE_KEY].contains("weight"));
    }

    #[test]
    fn update_ignores_unknown_ids_and_sections() {
        let mut store = squat_store();
        store.add(section("Main"));
        let section_id = store.items()[1].id().to_string();
        let writes = store.storage().writes;
        assert!(!store.update("missing", ExercisePatch::exercise("Row")));
        assert!(!store.update(&section_id, ExercisePatch::exercise("Row")));
        assert_eq!(store.storage().writes, writes);
    }

    #[test]
    fn update_normalizes_non_finite_numbers() {
        let mut store = squat_store();
        store.update("a", ExercisePatch::rest_sec(Some(f64::NAN)));
        store.update("a", ExercisePatch::series(Some(0)));
        match store.get("a") {
            Some(Item::Exercise(ex)) => {
                assert_eq!(ex.rest_sec, None);
                assert_eq!(ex.series, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store_with(&["Squat", "Bench"]);
        let id = store.items()[0].id().to_string();
        assert!(store.remove(&id));
        let after_first = store.items().to_vec();
        assert!(!store.remove(&id));
        assert_eq!(store.items(), after_first.as_slice());
    }

    #[test]
    fn clear_all_persists_an_empty_list() {
        let mut store = store_with(&["Squat", "Bench"]);
        assert!(store.clear_all());
        assert!(store.is_empty());
        assert!(reload(&store).is_empty());
    }

    #[test]
    fn duplicate_last_copies_fields_under_new_id() {
        let mut store = squat_store();
        assert!(store.duplicate_last());
        assert_eq!(store.len(), 2);
        let (first, second) = (&store.items()[0], &store.items()[1]);
        assert_ne!(first.id(), second.id());
        assert_eq!(&second.with_id("a".into()), first);
    }

    #[test]
    fn duplicate_last_keeps_section_variant() {
        let mut store = store_with(&["Squat"]);
        store.add(section("Cooldown"));
        store.duplicate_last();
        assert_eq!(names(&store), vec!["Squat", "#Cooldown", "#Cooldown"]);
    }

    #[test]
    fn duplicate_last_on_empty_list_is_noop() {
        let mut store = empty_store();
        assert!(!store.duplicate_last());
        assert!(store.is_empty());
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn move_up_and_down_swap_neighbours() {
        let mut store = store_with(&["A", "B", "C"]);
        let b = store.items()[1].id().to_string();
        assert!(store.move_item(&b, Direction::Up));
        assert_eq!(names(&store), vec!["B", "A", "C"]);
        assert!(store.move_item(&b, Direction::Down));
        assert!(store.move_item(&b, Direction::Down));
        assert_eq!(names(&store), vec!["A", "C", "B"]);
    }

    #[test]
    fn move_at_the_edges_is_noop() {
        let mut store = store_with(&["A", "B", "C"]);
        let a = store.items()[0].id().to_string();
        let c = store.items()[2].id().to_string();
        assert!(!store.move_item(&a, Direction::Up));
        assert!(!store.move_item(&a, Direction::Top));
        assert!(!store.move_item(&c, Direction::Down));
        assert!(!store.move_item(&c, Direction::Bottom));
        assert!(!store.move_item("missing", Direction::Top));
        assert_eq!(names(&store), vec!["A", "B", "C"]);
    }

    #[test]
    fn move_to_top_and_bottom_keeps_other_order() {
        let mut store = store_with(&["A", "B", "C", "D"]);
        let c = store.items()[2].id().to_string();
        assert!(store.move_item(&c, Direction::Top));
        assert_eq!(names(&store), vec!["C", "A", "B", "D"]);
        assert!(store.move_item(&c, Direction::Bottom));
        assert_eq!(names(&store), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn insert_section_above_places_section_before_target() {
        let mut store = store_with(&["A", "B"]);
        let b = store.items()[1].id().to_string();
        assert!(store.insert_section_above(&b, " Main "));
        assert_eq!(names(&store), vec!["A", "#Main", "B"]);
    }

    #[test]
    fn insert_section_above_missing_id_or_blank_title_is_noop() {
        let mut store = store_with(&["A"]);
        let a = store.items()[0].id().to_string();
        assert!(!store.insert_section_above("missing-id", "Warm-up"));
        assert!(!store.insert_section_above(&a, "   "));
        assert_eq!(names(&store), vec!["A"]);
    }

    #[test]
    fn reorder_replaces_sequence_as_given() {
        let mut store = store_with(&["A", "B", "C"]);
        let mut reversed = store.items().to_vec();
        reversed.reverse();
        assert!(store.reorder(reversed));
        assert_eq!(names(&store), vec!["C", "B", "A"]);
        assert_eq!(names(&reload(&store)), vec!["C", "B", "A"]);
    }

    #[test]
    fn every_change_is_written_through() {
        let mut store = store_with(&["A", "B"]);
        let a = store.items()[0].id().to_string();
        store.move_item(&a, Direction::Bottom);
        store.update(&a, ExercisePatch::reps(Some("10".into())));
        let reloaded = reload(&store);
        assert_eq!(reloaded.items(), store.items());
    }

    #[test]
    fn failed_writes_leave_memory_state_authoritative() {
        let mut store = store_with(&["A"]);
        store.storage_mut().fail_writes = true;
        assert!(store.add(exercise("B")));
        assert!(store.duplicate_last());
        assert_eq!(names(&store), vec!["A", "B", "B"]);
        assert_eq!(names(&reload(&store)), vec!["A"]);
    }

    #[test]
    fn load_recovers_from_garbage() {
        let store = ListStore::load(
            MemoryStore::with_value(LOCAL_STORAGE_KEY, "{oops"),
            IdStrategy::Uuid,
        );
        assert!(store.is_empty());
    }

    #[test]
    fn loading_does_not_write() {
        let store = squat_store();
        assert_eq!(store.storage().writes, 0);
    }
}
