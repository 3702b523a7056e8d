//! Integration tests for the page repository and the invariants it drives:
//! - Slug derivation and collision suffixing
//! - Home-page exclusivity on create and update
//! - Display ordering via reorder
//! - Public navigation and slug lookups

use assert_matches::assert_matches;
use pageforge_db::models::page::{CreatePage, UpdatePage};
use pageforge_db::repositories::PageRepo;
use pageforge_db::{MemoryStore, StoreError};

mod common;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn home(name: &str) -> CreatePage {
    CreatePage {
        is_home: true,
        ..CreatePage::named(name)
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_derives_slug_from_name() {
    let store = MemoryStore::new();
    let page = PageRepo::create(&store, &CreatePage::named("Über uns & Team"))
        .await
        .unwrap();
    assert_eq!(page.slug, "uber-uns-team");
}

#[tokio::test]
async fn colliding_names_get_suffixed_slugs() {
    let store = MemoryStore::new();
    let a = PageRepo::create(&store, &CreatePage::named("About")).await.unwrap();
    let b = PageRepo::create(&store, &CreatePage::named("about")).await.unwrap();
    let c = PageRepo::create(&store, &CreatePage::named("ABOUT!")).await.unwrap();
    assert_eq!(a.slug, "about");
    assert_eq!(b.slug, "about-2");
    assert_eq!(c.slug, "about-3");
}

#[tokio::test]
async fn renaming_regenerates_slug_but_keeps_own() {
    let store = MemoryStore::new();
    let page = PageRepo::create(&store, &CreatePage::named("Contact")).await.unwrap();

    let renamed = PageRepo::update(
        &store,
        &page.id,
        &UpdatePage {
            name: Some("Contact".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("page exists");
    assert_eq!(renamed.slug, "contact");

    let renamed = PageRepo::update(
        &store,
        &page.id,
        &UpdatePage {
            name: Some("Get in touch".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.slug, "get-in-touch");
    assert!(PageRepo::find_by_slug(&store, "contact").await.unwrap().is_none());
}

#[tokio::test]
async fn update_missing_page_returns_none() {
    let store = MemoryStore::new();
    let result = PageRepo::update(&store, "missing", &UpdatePage::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Home exclusivity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creating_a_home_page_demotes_the_previous_one() {
    let store = MemoryStore::new();
    let first = PageRepo::create(&store, &home("Welcome")).await.unwrap();
    let second = PageRepo::create(&store, &home("New welcome")).await.unwrap();

    let first = PageRepo::find_by_id(&store, &first.id).await.unwrap().unwrap();
    assert!(!first.is_home);
    assert!(second.is_home);
    assert_eq!(PageRepo::find_home(&store).await.unwrap().unwrap().id, second.id);
}

#[tokio::test]
async fn promotion_clears_every_previous_holder() {
    let store = MemoryStore::new();
    let a = PageRepo::create(&store, &CreatePage::named("A")).await.unwrap();
    let b = PageRepo::create(&store, &CreatePage::named("B")).await.unwrap();
    let c = PageRepo::create(&store, &CreatePage::named("C")).await.unwrap();

    // Put the store into a state with two home pages by writing directly.
    for id in [&a.id, &b.id] {
        pageforge_db::RecordStore::update(
            &store,
            "pages",
            id,
            pageforge_db::store::single_field("is_home", true),
        )
        .await
        .unwrap();
    }

    PageRepo::update(
        &store,
        &c.id,
        &UpdatePage {
            is_home: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let homes: Vec<_> = PageRepo::list(&store)
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.is_home)
        .map(|p| p.id)
        .collect();
    assert_eq!(homes, [c.id]);
}

#[tokio::test]
async fn find_home_ignores_inactive_home() {
    let store = MemoryStore::new();
    PageRepo::create(
        &store,
        &CreatePage {
            active: false,
            ..home("Draft home")
        },
    )
    .await
    .unwrap();
    assert!(PageRepo::find_home(&store).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_clear_fails_the_promotion() {
    let store = common::FlakyStore::new();
    let old = PageRepo::create(store.as_ref(), &home("Old")).await.unwrap();
    let candidate = PageRepo::create(store.as_ref(), &CreatePage::named("New"))
        .await
        .unwrap();
    store.fail_updates_for(&old.id);

    let result = PageRepo::update(
        store.as_ref(),
        &candidate.id,
        &UpdatePage {
            is_home: Some(true),
            ..Default::default()
        },
    )
    .await;
    assert_matches!(result, Err(StoreError::Batch { failed: 1, total: 1, .. }));

    let candidate = PageRepo::find_by_id(store.as_ref(), &candidate.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!candidate.is_home);
}

// ---------------------------------------------------------------------------
// Ordering and lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_persists_list_positions() {
    let store = MemoryStore::new();
    let mut ids = Vec::new();
    for name in ["One", "Two", "Three"] {
        ids.push(PageRepo::create(&store, &CreatePage::named(name)).await.unwrap().id);
    }

    let wanted = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
    PageRepo::reorder(&store, &wanted).await.unwrap();

    let listed: Vec<_> = PageRepo::list(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.order))
        .collect();
    assert_eq!(
        listed,
        [(wanted[0].clone(), 0), (wanted[1].clone(), 1), (wanted[2].clone(), 2)]
    );
}

#[tokio::test]
async fn partial_reorder_failure_keeps_applied_writes() {
    let store = common::FlakyStore::new();
    let mut ids = Vec::new();
    for name in ["One", "Two", "Three"] {
        ids.push(
            PageRepo::create(store.as_ref(), &CreatePage::named(name))
                .await
                .unwrap()
                .id,
        );
    }
    store.fail_updates_for(&ids[1]);

    let wanted = vec![ids[2].clone(), ids[1].clone(), ids[0].clone()];
    let result = PageRepo::reorder(store.as_ref(), &wanted).await;
    assert_matches!(result, Err(StoreError::Batch { failed: 1, total: 3, .. }));

    let third = PageRepo::find_by_id(store.as_ref(), &ids[2]).await.unwrap().unwrap();
    let first = PageRepo::find_by_id(store.as_ref(), &ids[0]).await.unwrap().unwrap();
    assert_eq!(third.order, 0);
    assert_eq!(first.order, 2);
}

#[tokio::test]
async fn navigation_lists_public_non_home_pages_in_order() {
    let store = MemoryStore::new();
    PageRepo::create(&store, &home("Home")).await.unwrap();
    PageRepo::create(
        &store,
        &CreatePage {
            order: 2,
            ..CreatePage::named("Blog")
        },
    )
    .await
    .unwrap();
    PageRepo::create(
        &store,
        &CreatePage {
            order: 1,
            ..CreatePage::named("About")
        },
    )
    .await
    .unwrap();
    PageRepo::create(
        &store,
        &CreatePage {
            accessible: false,
            ..CreatePage::named("Hidden")
        },
    )
    .await
    .unwrap();
    PageRepo::create(
        &store,
        &CreatePage {
            active: false,
            ..CreatePage::named("Draft")
        },
    )
    .await
    .unwrap();

    let names: Vec<_> = PageRepo::list_navigation(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["About", "Blog"]);
}

#[tokio::test]
async fn subscription_sees_created_pages() {
    let store: std::sync::Arc<dyn pageforge_db::RecordStore> =
        std::sync::Arc::new(MemoryStore::new());
    let mut sub = PageRepo::subscribe(std::sync::Arc::clone(&store));
    assert!(sub.next().await.unwrap().is_empty());

    PageRepo::create(store.as_ref(), &CreatePage::named("Fresh"))
        .await
        .unwrap();
    let snapshot = sub.next().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].slug, "fresh");
}
