//! PostgreSQL repository tests.
//!
//! These run against the database named by `PG_DSN` and are skipped when the
//! variable is not set. Every note they create is deleted again.

use notes_api::{
    models::NoteChanges,
    repository::{NoteStore, Repository},
};

async fn setup_repository() -> Option<Repository> {
    let Ok(dsn) = std::env::var("PG_DSN") else {
        eprintln!("PG_DSN not set, skipping PostgreSQL repository test");
        return None;
    };

    let mut repo = Repository::new(&dsn)
        .await
        .expect("Failed to connect to test database");
    repo.migrate().await.expect("Failed to migrate test database");
    Some(repo)
}

#[tokio::test]
async fn insert_then_fetch_round_trips() {
    let Some(repo) = setup_repository().await else {
        return;
    };

    let note = repo
        .insert("T".to_string(), "C".to_string())
        .await
        .expect("Failed to insert note");
    let fetched = repo
        .get_by_id(note.id)
        .await
        .expect("Failed to fetch note")
        .expect("Note should exist");

    assert_eq!(fetched, note);
    assert_eq!(fetched.title, "T");
    assert_eq!(fetched.content, "C");
    assert_eq!(fetched.updated_at, fetched.created_at);

    assert!(repo.delete(note.id).await.unwrap());
}

#[tokio::test]
async fn list_is_ordered_newest_first() {
    let Some(repo) = setup_repository().await else {
        return;
    };

    let mut ids = Vec::new();
    for i in 0..3 {
        let note = repo
            .insert(format!("order-{i}"), "body".to_string())
            .await
            .expect("Failed to insert note");
        ids.push(note.id);
    }

    let notes = repo.list_all().await.expect("Failed to list notes");
    for pair in notes.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    let positions: Vec<usize> = ids
        .iter()
        .map(|id| notes.iter().position(|note| note.id == *id).unwrap())
        .collect();
    assert!(positions[2] < positions[1] && positions[1] < positions[0]);

    for id in ids {
        repo.delete(id).await.unwrap();
    }
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() {
    let Some(repo) = setup_repository().await else {
        return;
    };

    let note = repo
        .insert("Old Title".to_string(), "Original Content".to_string())
        .await
        .unwrap();

    let updated = repo
        .update(
            note.id,
            NoteChanges {
                title: Some("X".to_string()),
                content: None,
            },
        )
        .await
        .unwrap()
        .expect("Note should exist");

    assert_eq!(updated.title, "X");
    assert_eq!(updated.content, "Original Content");
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at > note.updated_at);

    // An update that supplies no values is not a modification
    let unchanged = repo
        .update(note.id, NoteChanges::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.updated_at, updated.updated_at);

    repo.delete(note.id).await.unwrap();
}

#[tokio::test]
async fn missing_ids_are_reported() {
    let Some(repo) = setup_repository().await else {
        return;
    };

    let note = repo
        .insert("Doomed".to_string(), "Content".to_string())
        .await
        .unwrap();
    assert!(repo.delete(note.id).await.unwrap());

    assert!(repo.get_by_id(note.id).await.unwrap().is_none());
    assert!(!repo.delete(note.id).await.unwrap());
    assert!(
        repo.update(note.id, NoteChanges::default())
            .await
            .unwrap()
            .is_none()
    );
}
