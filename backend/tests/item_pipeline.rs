//! Behavioural coverage for the item pipeline over the in-memory store.

use std::collections::BTreeSet;
use std::sync::Arc;

use rstest::rstest;
use rstest_bdd_macros::{given, then, when};

use curio_backend::domain::ports::{
    CollectionCommand, CommentCommand, CommentQuery, CreateCollectionRequest, FieldDefinition,
    FieldValueStore, ItemCommand, ItemQuery, ItemRepository, ItemWrite, SignUpRequest,
    UserRepository,
};
use curio_backend::domain::{
    CollectionField, CollectionId, CollectionName, CollectionService, CommentService,
    CommentText, Email, ErrorCode, FieldId, FieldName, FieldType, FieldValue, FieldValueMap,
    Fullname, ItemName, ItemService, PlainPassword, Requester, Tag, Topic, TypedFieldWrites,
    User, UserService,
};
use curio_backend::outbound::memory::MemoryStore;
use curio_backend::outbound::security::BcryptPasswordHasher;

// Behavioural steps for the schema check itself; composed manually below.

#[given("a collection schema with one number field")]
fn a_number_only_schema() -> Vec<CollectionField> {
    vec![CollectionField::new(
        FieldId::random(),
        CollectionId::random(),
        FieldName::new("Year").expect("valid name"),
        FieldType::Number,
    )]
}

#[when("values omitting the field are partitioned")]
fn values_omitting_the_field_are_partitioned(
    schema: Vec<CollectionField>,
) -> (
    Vec<CollectionField>,
    Result<TypedFieldWrites, curio_backend::domain::FieldSetError>,
) {
    let result = TypedFieldWrites::partition(&schema, FieldValueMap::new());
    (schema, result)
}

#[then("the number field is reported missing")]
fn the_number_field_is_reported_missing(
    outcome: (
        Vec<CollectionField>,
        Result<TypedFieldWrites, curio_backend::domain::FieldSetError>,
    ),
) {
    let (schema, result) = outcome;
    let err = result.expect_err("partition must fail");
    assert_eq!(err.mismatches.len(), 1);
    assert_eq!(err.mismatches[0].field_type, FieldType::Number);
    assert!(err.mismatches[0].missing.contains(schema[0].id()));
}

#[rstest]
fn omitting_a_defined_field_fails_the_schema_check() {
    let schema = a_number_only_schema();
    let outcome = values_omitting_the_field_are_partitioned(schema);
    the_number_field_is_reported_missing(outcome);
}

// Full-pipeline scenarios over the in-memory store.

struct Pipeline {
    store: MemoryStore,
    collections: CollectionService<MemoryStore, MemoryStore, MemoryStore>,
    items: ItemService<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore>,
    comments: CommentService<MemoryStore, MemoryStore, MemoryStore>,
    owner: Requester,
}

impl Pipeline {
    async fn new() -> Self {
        let store = MemoryStore::new();
        let users = Arc::new(store.clone());
        let accounts = UserService::new(Arc::clone(&users), Arc::new(BcryptPasswordHasher::new(4)));
        let owner: User = curio_backend::domain::ports::AccountCommand::sign_up(
            &accounts,
            SignUpRequest {
                email: Email::new("ada@example.com").expect("valid email"),
                fullname: Fullname::new("Ada Lovelace").expect("valid fullname"),
                password: PlainPassword::new("longenough").expect("valid password"),
            },
        )
        .await
        .expect("owner signs up");

        let collections = CollectionService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&users),
        );
        let items = ItemService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&users),
        );
        let comments = CommentService::new(Arc::new(store.clone()), Arc::new(store.clone()), users);
        Self {
            store,
            collections,
            items,
            comments,
            owner: Requester::authenticated(*owner.id()),
        }
    }

    /// Create a collection defining one field of every type; returns the
    /// collection id and the field ids in declaration order.
    async fn collection_with_all_field_types(&self) -> (CollectionId, Vec<CollectionField>) {
        let definitions = [
            ("Year", FieldType::Number),
            ("Country", FieldType::Text),
            ("Notes", FieldType::MultilineText),
            ("Owned", FieldType::Checkbox),
            ("Issued", FieldType::Date),
        ];
        let created = self
            .collections
            .create(
                &self.owner,
                CreateCollectionRequest {
                    name: CollectionName::new("Stamps").expect("valid name"),
                    topic: Topic::new("Philately").expect("valid topic"),
                    image_url: None,
                    fields: definitions
                        .iter()
                        .map(|(name, field_type)| FieldDefinition {
                            name: FieldName::new(*name).expect("valid name"),
                            field_type: *field_type,
                        })
                        .collect(),
                },
            )
            .await
            .expect("collection created");
        (*created.collection.id(), created.fields)
    }

    fn matching_values(fields: &[CollectionField]) -> FieldValueMap {
        fields
            .iter()
            .map(|field| {
                let value = match field.field_type() {
                    FieldType::Number => FieldValue::Number(1840.0),
                    FieldType::Text => FieldValue::Text("United Kingdom".to_owned()),
                    FieldType::MultilineText => {
                        FieldValue::MultilineText("World's first\nadhesive stamp".to_owned())
                    }
                    FieldType::Checkbox => FieldValue::Checkbox(true),
                    FieldType::Date => FieldValue::Date(chrono::Utc::now()),
                };
                (*field.id(), value)
            })
            .collect()
    }

    fn write(values: FieldValueMap) -> ItemWrite {
        ItemWrite {
            name: ItemName::new("Penny Black").expect("valid name"),
            tags: [
                Tag::new("rare").expect("valid tag"),
                Tag::new("stamp").expect("valid tag"),
            ]
            .into_iter()
            .collect(),
            values,
        }
    }
}

#[rstest]
#[tokio::test]
async fn created_items_round_trip_name_tags_and_values() {
    let pipeline = Pipeline::new().await;
    let (collection_id, fields) = pipeline.collection_with_all_field_types().await;
    let values = Pipeline::matching_values(&fields);

    let created = pipeline
        .items
        .create(&pipeline.owner, &collection_id, Pipeline::write(values.clone()))
        .await
        .expect("item created");

    let fetched = pipeline
        .items
        .get(created.item.id())
        .await
        .expect("item fetched");
    assert_eq!(fetched.item.name().as_ref(), "Penny Black");
    let expected_tags: BTreeSet<Tag> = [
        Tag::new("rare").expect("valid tag"),
        Tag::new("stamp").expect("valid tag"),
    ]
    .into_iter()
    .collect();
    assert_eq!(fetched.item.tags(), &expected_tags);
    assert_eq!(fetched.values, values);
}

#[rstest]
#[tokio::test]
async fn mismatched_field_sets_fail_before_any_write() {
    let pipeline = Pipeline::new().await;
    let (collection_id, fields) = pipeline.collection_with_all_field_types().await;
    let mut values = Pipeline::matching_values(&fields);
    // Drop one defined field and add one undefined field.
    values.remove(fields[0].id());
    values.insert(FieldId::random(), FieldValue::Checkbox(false));

    let err = pipeline
        .items
        .create(&pipeline.owner, &collection_id, Pipeline::write(values))
        .await
        .expect_err("mismatch must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    // Nothing was persisted: no item rows, no value rows.
    let items = ItemRepository::list_for_collection(&pipeline.store, &collection_id)
        .await
        .expect("list succeeds");
    assert!(items.is_empty());
}

#[rstest]
#[tokio::test]
async fn updates_replace_values_under_the_same_schema_check() {
    let pipeline = Pipeline::new().await;
    let (collection_id, fields) = pipeline.collection_with_all_field_types().await;
    let values = Pipeline::matching_values(&fields);
    let created = pipeline
        .items
        .create(&pipeline.owner, &collection_id, Pipeline::write(values.clone()))
        .await
        .expect("item created");

    let mut updated_values = values;
    updated_values.insert(*fields[0].id(), FieldValue::Number(1841.0));
    let updated = pipeline
        .items
        .update(
            &pipeline.owner,
            created.item.id(),
            ItemWrite {
                name: ItemName::new("Penny Red").expect("valid name"),
                tags: BTreeSet::new(),
                values: updated_values.clone(),
            },
        )
        .await
        .expect("item updated");
    assert_eq!(updated.item.name().as_ref(), "Penny Red");

    let stored = pipeline
        .store
        .load_for_item(created.item.id())
        .await
        .expect("values load");
    assert_eq!(stored, updated_values);

    // Update with a mismatched set is rejected and leaves the item alone.
    let err = pipeline
        .items
        .update(
            &pipeline.owner,
            created.item.id(),
            ItemWrite {
                name: ItemName::new("Penny Blue").expect("valid name"),
                tags: BTreeSet::new(),
                values: FieldValueMap::new(),
            },
        )
        .await
        .expect_err("empty set fails a non-empty schema");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let unchanged = pipeline
        .items
        .get(created.item.id())
        .await
        .expect("item still fetchable");
    assert_eq!(unchanged.item.name().as_ref(), "Penny Red");
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_write_into_foreign_collections() {
    let pipeline = Pipeline::new().await;
    let (collection_id, fields) = pipeline.collection_with_all_field_types().await;
    let stranger = User::new(
        curio_backend::domain::UserId::random(),
        Email::new("bob@example.com").expect("valid email"),
        Fullname::new("Bob").expect("valid fullname"),
        curio_backend::domain::PasswordHash::new("$2b$04$stub").expect("valid hash"),
    );
    UserRepository::insert(&pipeline.store, &stranger)
        .await
        .expect("stranger exists");

    let err = pipeline
        .items
        .create(
            &Requester::authenticated(*stranger.id()),
            &collection_id,
            Pipeline::write(Pipeline::matching_values(&fields)),
        )
        .await
        .expect_err("stranger denied");
    assert_eq!(err.code(), ErrorCode::NotAuthorized);
}

#[rstest]
#[tokio::test]
async fn deleting_an_item_cascades_values_and_comments() {
    let pipeline = Pipeline::new().await;
    let (collection_id, fields) = pipeline.collection_with_all_field_types().await;
    let created = pipeline
        .items
        .create(
            &pipeline.owner,
            &collection_id,
            Pipeline::write(Pipeline::matching_values(&fields)),
        )
        .await
        .expect("item created");
    pipeline
        .comments
        .add(
            &pipeline.owner,
            created.item.id(),
            CommentText::new("lovely stamp").expect("valid text"),
        )
        .await
        .expect("comment added");

    pipeline
        .items
        .delete(&pipeline.owner, created.item.id())
        .await
        .expect("item deleted");

    let err = pipeline
        .items
        .get(created.item.id())
        .await
        .expect_err("item is gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let values = pipeline
        .store
        .load_for_item(created.item.id())
        .await
        .expect("values load");
    assert!(values.is_empty());
    let err = pipeline
        .comments
        .list_for_item(created.item.id())
        .await
        .expect_err("listing comments for a deleted item is not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
