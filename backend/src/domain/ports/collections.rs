//! Driving ports for the collection lifecycle.

use async_trait::async_trait;

use crate::domain::{
    Collection, CollectionField, CollectionId, CollectionName, Error, FieldId, FieldName,
    FieldType, ImageUrl, Requester, Topic, UserId,
};

/// A field definition supplied when creating or extending a collection.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name shown to users.
    pub name: FieldName,
    /// Declared value shape.
    pub field_type: FieldType,
}

/// Validated collection creation request.
#[derive(Debug, Clone)]
pub struct CreateCollectionRequest {
    /// Collection name.
    pub name: CollectionName,
    /// Topic the collection is filed under.
    pub topic: Topic,
    /// Optional cover image.
    pub image_url: Option<ImageUrl>,
    /// Initial typed field definitions.
    pub fields: Vec<FieldDefinition>,
}

/// Validated collection update request; replaces the mutable attributes.
#[derive(Debug, Clone)]
pub struct UpdateCollectionRequest {
    /// New collection name.
    pub name: CollectionName,
    /// New topic.
    pub topic: Topic,
    /// New cover image, or `None` to clear it.
    pub image_url: Option<ImageUrl>,
}

/// A collection together with its field definitions.
#[derive(Debug, Clone)]
pub struct CollectionWithFields {
    /// The collection itself.
    pub collection: Collection,
    /// Its typed field definitions, ordered by name.
    pub fields: Vec<CollectionField>,
}

/// Mutating collection use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Create a collection owned by the requester, with its initial fields.
    async fn create(
        &self,
        requester: &Requester,
        request: CreateCollectionRequest,
    ) -> Result<CollectionWithFields, Error>;

    /// Replace a collection's mutable attributes; owner or admin only.
    async fn update(
        &self,
        requester: &Requester,
        id: &CollectionId,
        request: UpdateCollectionRequest,
    ) -> Result<Collection, Error>;

    /// Delete a collection and everything in it; owner or admin only.
    async fn delete(&self, requester: &Requester, id: &CollectionId) -> Result<(), Error>;

    /// Add a field definition to an existing collection; owner or admin only.
    async fn add_field(
        &self,
        requester: &Requester,
        id: &CollectionId,
        definition: FieldDefinition,
    ) -> Result<CollectionField, Error>;

    /// Remove a field definition from a collection; owner or admin only.
    async fn remove_field(
        &self,
        requester: &Requester,
        id: &CollectionId,
        field_id: &FieldId,
    ) -> Result<(), Error>;
}

/// Read-only collection use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionQuery: Send + Sync {
    /// Fetch a collection with its field definitions.
    async fn get(&self, id: &CollectionId) -> Result<CollectionWithFields, Error>;

    /// List the collections owned by a user.
    async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Collection>, Error>;

    /// List every collection.
    async fn list_all(&self) -> Result<Vec<Collection>, Error>;
}
