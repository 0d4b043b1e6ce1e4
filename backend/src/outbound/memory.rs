//! In-memory implementations of every driven port.
//!
//! One [`MemoryStore`] stands in for the whole relational database: it backs
//! integration tests and the database-less development server. Deletes
//! cascade the way the SQL schema's foreign keys do, so behaviour matches
//! the Diesel adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    CollectionFieldRepository, CollectionRepository, CollectionRepositoryError, CommentRepository,
    CommentRepositoryError, FieldRepositoryError, FieldValueStore, FieldValueStoreError,
    ItemRepository, ItemRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Collection, CollectionField, CollectionId, Comment, Email, FieldId, FieldValue, FieldValueMap,
    Item, ItemId, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    collections: HashMap<Uuid, Collection>,
    fields: HashMap<Uuid, CollectionField>,
    items: HashMap<Uuid, Item>,
    comments: HashMap<Uuid, Comment>,
    numbers: HashMap<(Uuid, Uuid), f64>,
    texts: HashMap<(Uuid, Uuid), String>,
    multiline_texts: HashMap<(Uuid, Uuid), String>,
    checkboxes: HashMap<(Uuid, Uuid), bool>,
    dates: HashMap<(Uuid, Uuid), DateTime<Utc>>,
}

impl State {
    fn cascade_delete_field(&mut self, field_id: Uuid) {
        self.numbers.retain(|(_, f), _| *f != field_id);
        self.texts.retain(|(_, f), _| *f != field_id);
        self.multiline_texts.retain(|(_, f), _| *f != field_id);
        self.checkboxes.retain(|(_, f), _| *f != field_id);
        self.dates.retain(|(_, f), _| *f != field_id);
    }

    fn cascade_delete_item(&mut self, item_id: Uuid) {
        self.numbers.retain(|(i, _), _| *i != item_id);
        self.texts.retain(|(i, _), _| *i != item_id);
        self.multiline_texts.retain(|(i, _), _| *i != item_id);
        self.checkboxes.retain(|(i, _), _| *i != item_id);
        self.dates.retain(|(i, _), _| *i != item_id);
        self.comments.retain(|_, c| *c.item_id().as_uuid() != item_id);
    }

    fn cascade_delete_collection(&mut self, collection_id: Uuid) {
        let field_ids: Vec<Uuid> = self
            .fields
            .values()
            .filter(|f| *f.collection_id().as_uuid() == collection_id)
            .map(|f| *f.id().as_uuid())
            .collect();
        for field_id in field_ids {
            self.fields.remove(&field_id);
            self.cascade_delete_field(field_id);
        }
        let item_ids: Vec<Uuid> = self
            .items
            .values()
            .filter(|i| *i.collection_id().as_uuid() == collection_id)
            .map(|i| *i.id().as_uuid())
            .collect();
        for item_id in item_ids {
            self.items.remove(&item_id);
            self.cascade_delete_item(item_id);
        }
        self.collections.remove(&collection_id);
    }
}

/// Shared in-memory database implementing every driven port.
///
/// Clones share the same state, exactly as pool handles share a database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation leaves the state consistent, so poison is recoverable.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(UserRepositoryError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.lock().users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock();
        let removed = state.users.remove(id.as_uuid()).is_some();
        if removed {
            let owned: Vec<Uuid> = state
                .collections
                .values()
                .filter(|c| c.owner_id() == id)
                .map(|c| *c.id().as_uuid())
                .collect();
            for collection_id in owned {
                state.cascade_delete_collection(collection_id);
            }
            state.comments.retain(|_, c| c.author_id() != id);
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| a.email().as_ref().cmp(b.email().as_ref()));
        Ok(users)
    }
}

#[async_trait]
impl CollectionRepository for MemoryStore {
    async fn insert(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        self.lock()
            .collections
            .insert(*collection.id().as_uuid(), collection.clone());
        Ok(())
    }

    async fn update(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        self.lock()
            .collections
            .insert(*collection.id().as_uuid(), collection.clone());
        Ok(())
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionRepositoryError> {
        let mut state = self.lock();
        let existed = state.collections.contains_key(id.as_uuid());
        if existed {
            state.cascade_delete_collection(*id.as_uuid());
        }
        Ok(existed)
    }

    async fn find_by_id(
        &self,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        Ok(self.lock().collections.get(id.as_uuid()).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let mut collections: Vec<Collection> = self
            .lock()
            .collections
            .values()
            .filter(|c| c.owner_id() == owner_id)
            .cloned()
            .collect();
        collections.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
        Ok(collections)
    }

    async fn list_all(&self) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let mut collections: Vec<Collection> =
            self.lock().collections.values().cloned().collect();
        collections.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
        Ok(collections)
    }
}

#[async_trait]
impl CollectionFieldRepository for MemoryStore {
    async fn insert(&self, field: &CollectionField) -> Result<(), FieldRepositoryError> {
        self.lock().fields.insert(*field.id().as_uuid(), field.clone());
        Ok(())
    }

    async fn delete(&self, id: &FieldId) -> Result<bool, FieldRepositoryError> {
        let mut state = self.lock();
        let removed = state.fields.remove(id.as_uuid()).is_some();
        if removed {
            state.cascade_delete_field(*id.as_uuid());
        }
        Ok(removed)
    }

    async fn find_by_id(
        &self,
        id: &FieldId,
    ) -> Result<Option<CollectionField>, FieldRepositoryError> {
        Ok(self.lock().fields.get(id.as_uuid()).cloned())
    }

    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<CollectionField>, FieldRepositoryError> {
        let mut fields: Vec<CollectionField> = self
            .lock()
            .fields
            .values()
            .filter(|f| f.collection_id() == collection_id)
            .cloned()
            .collect();
        fields.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
        Ok(fields)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        self.lock().items.insert(*item.id().as_uuid(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        self.lock().items.insert(*item.id().as_uuid(), item.clone());
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut state = self.lock();
        let removed = state.items.remove(id.as_uuid()).is_some();
        if removed {
            state.cascade_delete_item(*id.as_uuid());
        }
        Ok(removed)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self.lock().items.get(id.as_uuid()).cloned())
    }

    async fn list_for_collection(
        &self,
        collection_id: &CollectionId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items: Vec<Item> = self
            .lock()
            .items
            .values()
            .filter(|i| i.collection_id() == collection_id)
            .cloned()
            .collect();
        items.sort_by_key(Item::created_at);
        Ok(items)
    }
}

#[async_trait]
impl FieldValueStore for MemoryStore {
    async fn save_numbers(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, f64)],
    ) -> Result<(), FieldValueStoreError> {
        let mut state = self.lock();
        for (field_id, value) in values {
            state
                .numbers
                .insert((*item_id.as_uuid(), *field_id.as_uuid()), *value);
        }
        Ok(())
    }

    async fn save_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError> {
        let mut state = self.lock();
        for (field_id, value) in values {
            state
                .texts
                .insert((*item_id.as_uuid(), *field_id.as_uuid()), value.clone());
        }
        Ok(())
    }

    async fn save_multiline_texts(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, String)],
    ) -> Result<(), FieldValueStoreError> {
        let mut state = self.lock();
        for (field_id, value) in values {
            state
                .multiline_texts
                .insert((*item_id.as_uuid(), *field_id.as_uuid()), value.clone());
        }
        Ok(())
    }

    async fn save_checkboxes(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, bool)],
    ) -> Result<(), FieldValueStoreError> {
        let mut state = self.lock();
        for (field_id, value) in values {
            state
                .checkboxes
                .insert((*item_id.as_uuid(), *field_id.as_uuid()), *value);
        }
        Ok(())
    }

    async fn save_dates(
        &self,
        item_id: &ItemId,
        values: &[(FieldId, DateTime<Utc>)],
    ) -> Result<(), FieldValueStoreError> {
        let mut state = self.lock();
        for (field_id, value) in values {
            state
                .dates
                .insert((*item_id.as_uuid(), *field_id.as_uuid()), *value);
        }
        Ok(())
    }

    async fn load_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<FieldValueMap, FieldValueStoreError> {
        let state = self.lock();
        let mut map = FieldValueMap::new();
        let item = *item_id.as_uuid();
        for ((i, f), value) in &state.numbers {
            if *i == item {
                map.insert(FieldId::from_uuid(*f), FieldValue::Number(*value));
            }
        }
        for ((i, f), value) in &state.texts {
            if *i == item {
                map.insert(FieldId::from_uuid(*f), FieldValue::Text(value.clone()));
            }
        }
        for ((i, f), value) in &state.multiline_texts {
            if *i == item {
                map.insert(
                    FieldId::from_uuid(*f),
                    FieldValue::MultilineText(value.clone()),
                );
            }
        }
        for ((i, f), value) in &state.checkboxes {
            if *i == item {
                map.insert(FieldId::from_uuid(*f), FieldValue::Checkbox(*value));
            }
        }
        for ((i, f), value) in &state.dates {
            if *i == item {
                map.insert(FieldId::from_uuid(*f), FieldValue::Date(*value));
            }
        }
        Ok(map)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        self.lock()
            .comments
            .insert(*comment.id().as_uuid(), comment.clone());
        Ok(())
    }

    async fn list_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .values()
            .filter(|c| c.item_id() == item_id)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }
}
