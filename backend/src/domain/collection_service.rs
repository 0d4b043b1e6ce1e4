//! Collection lifecycle use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::access::AccessGuard;
use crate::domain::ports::{
    CollectionCommand, CollectionFieldRepository, CollectionQuery, CollectionRepository,
    CollectionRepositoryError, CollectionWithFields, CreateCollectionRequest, FieldDefinition,
    FieldRepositoryError, UpdateCollectionRequest, UserRepository,
};
use crate::domain::{
    Collection, CollectionField, CollectionId, Error, FieldId, Requester, UserId,
};

/// Collection service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CollectionService<C, F, U> {
    collections: Arc<C>,
    fields: Arc<F>,
    guard: AccessGuard<U>,
}

impl<C, F, U> CollectionService<C, F, U>
where
    U: UserRepository,
{
    /// Create a new service over the given repositories.
    pub fn new(collections: Arc<C>, fields: Arc<F>, users: Arc<U>) -> Self {
        Self {
            collections,
            fields,
            guard: AccessGuard::new(users),
        }
    }
}

fn map_collection_error(error: CollectionRepositoryError) -> Error {
    match error {
        CollectionRepositoryError::Connection { message } => Error::service_unavailable(message),
        CollectionRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_field_error(error: FieldRepositoryError) -> Error {
    match error {
        FieldRepositoryError::Connection { message } => Error::service_unavailable(message),
        FieldRepositoryError::Query { message } => Error::internal(message),
    }
}

impl<C, F, U> CollectionService<C, F, U>
where
    C: CollectionRepository,
    F: CollectionFieldRepository,
    U: UserRepository,
{
    async fn fetch_collection(&self, id: &CollectionId) -> Result<Collection, Error> {
        self.collections
            .find_by_id(id)
            .await
            .map_err(map_collection_error)?
            .ok_or_else(|| Error::not_found("no such collection"))
    }
}

#[async_trait]
impl<C, F, U> CollectionCommand for CollectionService<C, F, U>
where
    C: CollectionRepository,
    F: CollectionFieldRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        requester: &Requester,
        request: CreateCollectionRequest,
    ) -> Result<CollectionWithFields, Error> {
        let owner = self.guard.require_known(requester).await?;
        let collection = Collection::new(
            CollectionId::random(),
            request.name,
            *owner.id(),
            request.topic,
            request.image_url,
        );
        self.collections
            .insert(&collection)
            .await
            .map_err(map_collection_error)?;

        // Field definitions are written one by one, with no surrounding
        // transaction.
        let mut fields = Vec::with_capacity(request.fields.len());
        for definition in request.fields {
            let field = CollectionField::new(
                FieldId::random(),
                *collection.id(),
                definition.name,
                definition.field_type,
            );
            self.fields.insert(&field).await.map_err(map_field_error)?;
            fields.push(field);
        }
        info!(collection_id = %collection.id(), owner_id = %owner.id(), "collection created");
        Ok(CollectionWithFields { collection, fields })
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &CollectionId,
        request: UpdateCollectionRequest,
    ) -> Result<Collection, Error> {
        let collection = self.fetch_collection(id).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let updated =
            collection.with_attributes(request.name, request.topic, request.image_url);
        self.collections
            .update(&updated)
            .await
            .map_err(map_collection_error)?;
        Ok(updated)
    }

    async fn delete(&self, requester: &Requester, id: &CollectionId) -> Result<(), Error> {
        let collection = self.fetch_collection(id).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let removed = self
            .collections
            .delete(id)
            .await
            .map_err(map_collection_error)?;
        if !removed {
            return Err(Error::not_found("no such collection"));
        }
        info!(collection_id = %id, "collection deleted");
        Ok(())
    }

    async fn add_field(
        &self,
        requester: &Requester,
        id: &CollectionId,
        definition: FieldDefinition,
    ) -> Result<CollectionField, Error> {
        let collection = self.fetch_collection(id).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let field = CollectionField::new(
            FieldId::random(),
            *collection.id(),
            definition.name,
            definition.field_type,
        );
        self.fields.insert(&field).await.map_err(map_field_error)?;
        Ok(field)
    }

    async fn remove_field(
        &self,
        requester: &Requester,
        id: &CollectionId,
        field_id: &FieldId,
    ) -> Result<(), Error> {
        let collection = self.fetch_collection(id).await?;
        self.guard
            .require_collection_access(requester, &collection)
            .await?;
        let field = self
            .fields
            .find_by_id(field_id)
            .await
            .map_err(map_field_error)?
            .ok_or_else(|| Error::not_found("no such field"))?;
        if field.collection_id() != collection.id() {
            return Err(Error::not_found("no such field"));
        }
        let removed = self
            .fields
            .delete(field_id)
            .await
            .map_err(map_field_error)?;
        if !removed {
            return Err(Error::not_found("no such field"));
        }
        Ok(())
    }
}

#[async_trait]
impl<C, F, U> CollectionQuery for CollectionService<C, F, U>
where
    C: CollectionRepository,
    F: CollectionFieldRepository,
    U: UserRepository,
{
    async fn get(&self, id: &CollectionId) -> Result<CollectionWithFields, Error> {
        let collection = self.fetch_collection(id).await?;
        let fields = self
            .fields
            .list_for_collection(id)
            .await
            .map_err(map_field_error)?;
        Ok(CollectionWithFields { collection, fields })
    }

    async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Collection>, Error> {
        self.collections
            .list_by_owner(owner_id)
            .await
            .map_err(map_collection_error)
    }

    async fn list_all(&self) -> Result<Vec<Collection>, Error> {
        self.collections
            .list_all()
            .await
            .map_err(map_collection_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the collection use-cases.
    use super::*;
    use crate::domain::ports::{
        MockCollectionFieldRepository, MockCollectionRepository, MockUserRepository,
    };
    use crate::domain::{
        CollectionName, Email, ErrorCode, FieldName, FieldType, Fullname, PasswordHash, Topic,
        User,
    };

    fn known_user(id: UserId, admin: bool) -> User {
        User::from_parts(
            id,
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid fullname"),
            false,
            admin,
            PasswordHash::new("$2b$10$stored").expect("valid hash"),
        )
    }

    fn stored_collection(owner: UserId) -> Collection {
        Collection::new(
            CollectionId::random(),
            CollectionName::new("Stamps").expect("valid name"),
            owner,
            Topic::new("Philately").expect("valid topic"),
            None,
        )
    }

    fn create_request(field_count: usize) -> CreateCollectionRequest {
        CreateCollectionRequest {
            name: CollectionName::new("Stamps").expect("valid name"),
            topic: Topic::new("Philately").expect("valid topic"),
            image_url: None,
            fields: (0..field_count)
                .map(|i| FieldDefinition {
                    name: FieldName::new(format!("Field {i}")).expect("valid name"),
                    field_type: FieldType::Text,
                })
                .collect(),
        }
    }

    fn service(
        collections: MockCollectionRepository,
        fields: MockCollectionFieldRepository,
        users: MockUserRepository,
    ) -> CollectionService<
        MockCollectionRepository,
        MockCollectionFieldRepository,
        MockUserRepository,
    > {
        CollectionService::new(Arc::new(collections), Arc::new(fields), Arc::new(users))
    }

    #[tokio::test]
    async fn create_persists_collection_and_every_field() {
        let owner_id = UserId::random();
        let owner = known_user(owner_id, false);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(owner)));
        let mut collections = MockCollectionRepository::new();
        collections.expect_insert().times(1).return_once(|_| Ok(()));
        let mut fields = MockCollectionFieldRepository::new();
        fields.expect_insert().times(3).returning(|_| Ok(()));

        let created = service(collections, fields, users)
            .create(&Requester::authenticated(owner_id), create_request(3))
            .await
            .expect("create succeeds");
        assert_eq!(created.fields.len(), 3);
        assert_eq!(created.collection.owner_id(), &owner_id);
    }

    #[tokio::test]
    async fn create_requires_a_known_requester() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let mut collections = MockCollectionRepository::new();
        collections.expect_insert().times(0);

        let err = service(collections, MockCollectionFieldRepository::new(), users)
            .create(
                &Requester::authenticated(UserId::random()),
                create_request(0),
            )
            .await
            .expect_err("unknown requester denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn update_denies_non_owners() {
        let requester_id = UserId::random();
        let requester = known_user(requester_id, false);
        let target = stored_collection(UserId::random());
        let target_id = *target.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(requester)));
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(target)));
        collections.expect_update().times(0);

        let err = service(collections, MockCollectionFieldRepository::new(), users)
            .update(
                &Requester::authenticated(requester_id),
                &target_id,
                UpdateCollectionRequest {
                    name: CollectionName::new("Renamed").expect("valid name"),
                    topic: Topic::new("Philately").expect("valid topic"),
                    image_url: None,
                },
            )
            .await
            .expect_err("stranger denied");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn delete_by_admin_succeeds_for_foreign_collection() {
        let admin_id = UserId::random();
        let admin = known_user(admin_id, true);
        let target = stored_collection(UserId::random());
        let target_id = *target.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(admin)));
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(target)));
        collections.expect_delete().times(1).return_once(|_| Ok(true));

        service(collections, MockCollectionFieldRepository::new(), users)
            .delete(&Requester::authenticated(admin_id), &target_id)
            .await
            .expect("admin delete succeeds");
    }

    #[tokio::test]
    async fn remove_field_rejects_fields_of_other_collections() {
        let owner_id = UserId::random();
        let owner = known_user(owner_id, false);
        let target = stored_collection(owner_id);
        let target_id = *target.id();
        let foreign_field = CollectionField::new(
            FieldId::random(),
            CollectionId::random(),
            FieldName::new("Year").expect("valid name"),
            FieldType::Number,
        );
        let field_id = *foreign_field.id();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(owner)));
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(target)));
        let mut fields = MockCollectionFieldRepository::new();
        fields
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(foreign_field)));
        fields.expect_delete().times(0);

        let err = service(collections, fields, users)
            .remove_field(&Requester::authenticated(owner_id), &target_id, &field_id)
            .await
            .expect_err("foreign field rejected");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn get_returns_collection_with_fields() {
        let target = stored_collection(UserId::random());
        let target_id = *target.id();
        let field = CollectionField::new(
            FieldId::random(),
            target_id,
            FieldName::new("Year").expect("valid name"),
            FieldType::Number,
        );

        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(target)));
        let mut fields = MockCollectionFieldRepository::new();
        fields
            .expect_list_for_collection()
            .times(1)
            .return_once(move |_| Ok(vec![field]));

        let fetched = service(collections, fields, MockUserRepository::new())
            .get(&target_id)
            .await
            .expect("get succeeds");
        assert_eq!(fetched.fields.len(), 1);
    }
}
