use aboutpage_core::db::open_db_in_memory;
use aboutpage_core::{
    ConfigStore, ConfigValue, ContentItem, ContentQuery, EntityId, EntityLookup, FileEntity,
    LeaderRecord, LookupError, LookupResult, RosterEditor, RosterProjector, SqliteConfigStore,
    SqliteEntityLookup, UserEntity, CONFIG_CACHE_TAG, ROSTER_ASSET_BUNDLE,
};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use uuid::Uuid;

#[test]
fn submitted_roster_projects_in_slot_order_with_resolved_images() {
    let conn = open_db_in_memory().unwrap();
    let anchor = Uuid::new_v4();
    seed_user(&conn, anchor, "jordan");
    let file_id = Uuid::new_v4();
    seed_file(&conn, file_id, "public://leaders/alice.png");

    let mut editor = RosterEditor::new(SqliteConfigStore::try_new(&conn).unwrap());
    let mut session = editor.start().unwrap();
    editor.add_group(&mut session);
    let values = BTreeMap::from([
        (
            0,
            LeaderRecord {
                name: "Alice".to_string(),
                designation: "CEO".to_string(),
                linkedin_link: "https://linkedin.com/in/alice".to_string(),
                profile_image: Some(file_id),
            },
        ),
        (
            1,
            LeaderRecord {
                name: "Bob".to_string(),
                designation: "CTO".to_string(),
                linkedin_link: "https://linkedin.com/in/bob".to_string(),
                profile_image: None,
            },
        ),
    ]);
    editor.submit(&session, &values, Some(anchor)).unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    assert_eq!(payload.entries.len(), 2);
    assert_eq!(payload.entries[0].leader_name, "Alice");
    assert_eq!(
        payload.entries[0].profile_image_url,
        "/files/leaders/alice.png"
    );
    assert_eq!(payload.entries[1].leader_name, "Bob");
    assert_eq!(payload.entries[1].profile_image_url, "");
    assert_eq!(payload.anchor_name, "jordan");
}

#[test]
fn deleted_slots_are_skipped_even_when_their_fields_are_populated() {
    let conn = open_db_in_memory().unwrap();

    let mut store = SqliteConfigStore::try_new(&conn).unwrap();
    store
        .set("num_groups", ConfigValue::Integer(3))
        .set("deleted_groups", ConfigValue::Indices(vec![1]))
        .set("Leader_1_name", ConfigValue::Text("Alice".to_string()))
        .set("Leader_2_name", ConfigValue::Text("Stale".to_string()))
        .set("Leader_3_name", ConfigValue::Text("Cara".to_string()));
    store.save().unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    let names: Vec<&str> = payload
        .entries
        .iter()
        .map(|entry| entry.leader_name.as_str())
        .collect();
    assert_eq!(names, ["Alice", "Cara"]);
}

#[test]
fn unresolvable_anchor_degrades_to_empty_values() {
    let conn = open_db_in_memory().unwrap();

    let mut editor = RosterEditor::new(SqliteConfigStore::try_new(&conn).unwrap());
    let session = editor.start().unwrap();
    let values = BTreeMap::from([(0, named_leader("Alice"))]);
    editor
        .submit(&session, &values, Some(Uuid::new_v4()))
        .unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    assert_eq!(payload.anchor_name, "");
    assert_eq!(payload.anchor_bio, "");
    assert!(payload.latest_news.is_empty());
    assert_eq!(payload.entries.len(), 1);
    assert_eq!(payload.entries[0].leader_name, "Alice");
}

#[test]
fn missing_profile_image_file_yields_empty_url() {
    let conn = open_db_in_memory().unwrap();
    let anchor = Uuid::new_v4();
    seed_user(&conn, anchor, "jordan");

    let mut editor = RosterEditor::new(SqliteConfigStore::try_new(&conn).unwrap());
    let session = editor.start().unwrap();
    let values = BTreeMap::from([(
        0,
        LeaderRecord {
            profile_image: Some(Uuid::new_v4()),
            ..named_leader("Alice")
        },
    )]);
    editor.submit(&session, &values, Some(anchor)).unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    assert_eq!(payload.entries[0].profile_image_url, "");
}

#[test]
fn anchor_projection_carries_bio_and_three_newest_articles() {
    let conn = open_db_in_memory().unwrap();
    let anchor = Uuid::new_v4();
    seed_user(&conn, anchor, "jordan");
    seed_user_field(&conn, anchor, "description", "Evening news anchor");

    seed_content(&conn, anchor, "Oldest", 1_000, true, "article");
    seed_content(&conn, anchor, "Middle", 2_000, true, "article");
    seed_content(&conn, anchor, "Newer", 3_000, true, "article");
    seed_content(&conn, anchor, "Newest", 4_000, true, "article");
    seed_content(&conn, anchor, "Draft", 5_000, false, "article");
    seed_content(&conn, anchor, "Landing", 6_000, true, "page");
    seed_content(&conn, Uuid::new_v4(), "Foreign", 7_000, true, "article");

    let mut editor = RosterEditor::new(SqliteConfigStore::try_new(&conn).unwrap());
    let session = editor.start().unwrap();
    editor
        .submit(&session, &BTreeMap::new(), Some(anchor))
        .unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    assert_eq!(payload.anchor_name, "jordan");
    assert_eq!(payload.anchor_bio, "Evening news anchor");
    let titles: Vec<&str> = payload
        .latest_news
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(titles, ["Newest", "Newer", "Middle"]);
}

#[test]
fn absent_configuration_projects_an_empty_payload() {
    let conn = open_db_in_memory().unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        SqliteEntityLookup::try_new(&conn).unwrap(),
    );
    let payload = projector.project().unwrap();

    assert!(payload.entries.is_empty());
    assert_eq!(payload.anchor_name, "");
    assert_eq!(payload.anchor_bio, "");
    assert!(payload.latest_news.is_empty());
    assert_eq!(payload.cache_tag, CONFIG_CACHE_TAG);
    assert_eq!(payload.asset_bundle, ROSTER_ASSET_BUNDLE);
}

#[test]
fn lookup_failures_degrade_to_absent_values() {
    let conn = open_db_in_memory().unwrap();

    let mut editor = RosterEditor::new(SqliteConfigStore::try_new(&conn).unwrap());
    let session = editor.start().unwrap();
    let values = BTreeMap::from([(
        0,
        LeaderRecord {
            profile_image: Some(Uuid::new_v4()),
            ..named_leader("Alice")
        },
    )]);
    editor
        .submit(&session, &values, Some(Uuid::new_v4()))
        .unwrap();

    let projector = RosterProjector::new(
        SqliteConfigStore::try_new(&conn).unwrap(),
        FailingLookup,
    );
    let payload = projector.project().unwrap();

    assert_eq!(payload.entries.len(), 1);
    assert_eq!(payload.entries[0].profile_image_url, "");
    assert_eq!(payload.anchor_name, "");
    assert!(payload.latest_news.is_empty());
}

fn named_leader(name: &str) -> LeaderRecord {
    LeaderRecord {
        name: name.to_string(),
        designation: "CEO".to_string(),
        linkedin_link: format!("https://linkedin.com/in/{}", name.to_lowercase()),
        profile_image: None,
    }
}

fn seed_file(conn: &Connection, id: EntityId, uri: &str) {
    conn.execute(
        "INSERT INTO files (uuid, uri) VALUES (?1, ?2);",
        params![id.to_string(), uri],
    )
    .unwrap();
}

fn seed_user(conn: &Connection, id: EntityId, account_name: &str) {
    conn.execute(
        "INSERT INTO users (uuid, account_name) VALUES (?1, ?2);",
        params![id.to_string(), account_name],
    )
    .unwrap();
}

fn seed_user_field(conn: &Connection, user: EntityId, name: &str, value: &str) {
    conn.execute(
        "INSERT INTO user_fields (user_uuid, name, value) VALUES (?1, ?2, ?3);",
        params![user.to_string(), name, value],
    )
    .unwrap();
}

fn seed_content(
    conn: &Connection,
    author: EntityId,
    title: &str,
    created_at: i64,
    published: bool,
    kind: &str,
) {
    conn.execute(
        "INSERT INTO content_items (uuid, kind, title, summary, author_uuid, published, created_at)
         VALUES (?1, ?2, ?3, '', ?4, ?5, ?6);",
        params![
            Uuid::new_v4().to_string(),
            kind,
            title,
            author.to_string(),
            i64::from(published),
            created_at,
        ],
    )
    .unwrap();
}

/// Lookup double whose every call fails, standing in for a broken entity
/// backend.
struct FailingLookup;

impl EntityLookup for FailingLookup {
    fn load_file(&self, _id: EntityId) -> LookupResult<Option<FileEntity>> {
        Err(LookupError::InvalidData("file backend down".to_string()))
    }

    fn load_user(&self, _id: EntityId) -> LookupResult<Option<UserEntity>> {
        Err(LookupError::InvalidData("user backend down".to_string()))
    }

    fn query_content(&self, _query: &ContentQuery) -> LookupResult<Vec<EntityId>> {
        Err(LookupError::InvalidData("content backend down".to_string()))
    }

    fn load_content(&self, _ids: &[EntityId]) -> LookupResult<Vec<ContentItem>> {
        Err(LookupError::InvalidData("content backend down".to_string()))
    }
}
