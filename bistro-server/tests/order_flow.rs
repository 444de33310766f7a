//! Order workflow integration tests
//!
//! Exercises the cart ledger and checkout path against a real SQLite
//! database with migrations applied: consolidation, atomicity, price
//! snapshots and the visibility partition.

use bistro_server::db::repository::order::OrderScope;
use bistro_server::db::repository::{RepoError, cart, category, menu_item, order, user};
use bistro_server::{Config, ServerState};
use shared::models::{CategoryCreate, MenuItemCreate, Role, User};

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    (state, dir)
}

async fn seed_menu_item(state: &ServerState, title: &str, price: &str) -> i64 {
    let cat = match category::find_by_title(&state.pool, "Mains").await.unwrap() {
        Some(c) => c,
        None => category::create(
            &state.pool,
            CategoryCreate {
                title: "Mains".into(),
                slug: None,
            },
        )
        .await
        .unwrap(),
    };
    menu_item::create(
        &state.pool,
        MenuItemCreate {
            title: title.into(),
            price: price.parse().unwrap(),
            featured: Some(false),
            category_id: cat.id,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_user(state: &ServerState, username: &str) -> User {
    user::create(
        &state.pool,
        username,
        &format!("{username}@example.com"),
        "unused-hash",
        false,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn cart_consolidates_repeat_adds_into_one_line() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Bruschetta", "9.00").await;
    let u = seed_user(&state, "alice").await;

    cart::add_or_increment(&state.pool, u.id, item, 2).await.unwrap();
    let line = cart::add_or_increment(&state.pool, u.id, item, 3).await.unwrap();

    assert_eq!(line.quantity, 5);
    assert_eq!(line.unit_price, 900);
    assert_eq!(line.line_total, 4500);

    let lines = cart::list_for_user(&state.pool, u.id).await.unwrap();
    assert_eq!(lines.len(), 1);
}

#[tokio::test]
async fn cart_add_refreshes_unit_price_from_menu() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Soup", "4.00").await;
    let u = seed_user(&state, "bob").await;

    cart::add_or_increment(&state.pool, u.id, item, 1).await.unwrap();

    // Price change between adds: the line re-snapshots the current price
    menu_item::update(
        &state.pool,
        item,
        shared::models::MenuItemUpdate {
            title: None,
            price: Some("5.50".parse().unwrap()),
            featured: None,
            category_id: None,
        },
    )
    .await
    .unwrap();

    let line = cart::add_or_increment(&state.pool, u.id, item, 1).await.unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.unit_price, 550);
    assert_eq!(line.line_total, 1100);
}

#[tokio::test]
async fn cart_rejects_bad_quantity_and_unknown_item() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Olives", "3.00").await;
    let u = seed_user(&state, "carol").await;

    assert!(matches!(
        cart::add_or_increment(&state.pool, u.id, item, 0).await,
        Err(RepoError::Validation(_))
    ));
    assert!(matches!(
        cart::add_or_increment(&state.pool, u.id, 999_999, 1).await,
        Err(RepoError::Validation(_))
    ));
}

#[tokio::test]
async fn remove_line_and_clear_semantics() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Focaccia", "6.00").await;
    let u = seed_user(&state, "dave").await;

    assert!(matches!(
        cart::remove_line(&state.pool, u.id, item).await,
        Err(RepoError::NotFound(_))
    ));

    cart::add_or_increment(&state.pool, u.id, item, 1).await.unwrap();
    cart::remove_line(&state.pool, u.id, item).await.unwrap();
    assert!(cart::list_for_user(&state.pool, u.id).await.unwrap().is_empty());

    // Clearing an empty cart is a no-op, not an error
    assert_eq!(cart::clear_for_user(&state.pool, u.id).await.unwrap(), 0);
}

#[tokio::test]
async fn checkout_is_atomic_and_empties_the_cart() {
    let (state, _dir) = test_state().await;
    let item_a = seed_menu_item(&state, "Pasta", "5.00").await;
    let item_b = seed_menu_item(&state, "Salad", "3.00").await;
    let u = seed_user(&state, "erin").await;

    cart::add_or_increment(&state.pool, u.id, item_a, 2).await.unwrap();
    cart::add_or_increment(&state.pool, u.id, item_b, 1).await.unwrap();

    let placed = order::checkout(&state.pool, u.id).await.unwrap();
    assert_eq!(placed.user_id, u.id);
    assert!(!placed.status);
    assert_eq!(placed.total, 1300);

    let items = order::items_for(&state.pool, placed.id).await.unwrap();
    assert_eq!(items.len(), 2);
    let total_from_items: i64 = items.iter().map(|i| i.line_total).sum();
    assert_eq!(total_from_items, placed.total);

    assert!(cart::list_for_user(&state.pool, u.id).await.unwrap().is_empty());

    // Re-running checkout on the now-empty cart fails without side effects
    assert!(matches!(
        order::checkout(&state.pool, u.id).await,
        Err(RepoError::EmptyCart)
    ));
    assert_eq!(
        order::list_scoped(&state.pool, OrderScope::Owner(u.id))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn order_total_is_frozen_after_placement() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Risotto", "12.00").await;
    let u = seed_user(&state, "frank").await;

    cart::add_or_increment(&state.pool, u.id, item, 1).await.unwrap();
    let placed = order::checkout(&state.pool, u.id).await.unwrap();

    menu_item::update(
        &state.pool,
        item,
        shared::models::MenuItemUpdate {
            title: None,
            price: Some("20.00".parse().unwrap()),
            featured: None,
            category_id: None,
        },
    )
    .await
    .unwrap();

    let reread = order::find_by_id(&state.pool, placed.id).await.unwrap().unwrap();
    assert_eq!(reread.total, 1200);
    let items = order::items_for(&state.pool, placed.id).await.unwrap();
    assert_eq!(items[0].unit_price, 1200);
}

#[tokio::test]
async fn order_visibility_partition() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Gnocchi", "7.00").await;
    let u1 = seed_user(&state, "user1").await;
    let u2 = seed_user(&state, "user2").await;
    let d1 = seed_user(&state, "driver1").await;
    user::add_role(&state.pool, d1.id, Role::DeliveryCrew).await.unwrap();

    cart::add_or_increment(&state.pool, u1.id, item, 1).await.unwrap();
    let o1 = order::checkout(&state.pool, u1.id).await.unwrap();

    cart::add_or_increment(&state.pool, u2.id, item, 1).await.unwrap();
    let o2 = order::checkout(&state.pool, u2.id).await.unwrap();
    order::update_fields(&state.pool, o2.id, None, Some(d1.id)).await.unwrap();

    let own = order::list_scoped(&state.pool, OrderScope::Owner(u1.id)).await.unwrap();
    assert_eq!(own.iter().map(|o| o.id).collect::<Vec<_>>(), vec![o1.id]);

    let assigned = order::list_scoped(&state.pool, OrderScope::Crew(d1.id)).await.unwrap();
    assert_eq!(assigned.iter().map(|o| o.id).collect::<Vec<_>>(), vec![o2.id]);

    let all = order::list_scoped(&state.pool, OrderScope::All).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn crew_assignment_requires_the_role() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Tiramisu", "6.50").await;
    let u = seed_user(&state, "grace").await;
    let not_crew = seed_user(&state, "passerby").await;

    cart::add_or_increment(&state.pool, u.id, item, 1).await.unwrap();
    let placed = order::checkout(&state.pool, u.id).await.unwrap();

    assert!(matches!(
        order::update_fields(&state.pool, placed.id, None, Some(not_crew.id)).await,
        Err(RepoError::Validation(_))
    ));
}

#[tokio::test]
async fn order_delete_cascades_to_items() {
    let (state, _dir) = test_state().await;
    let item = seed_menu_item(&state, "Espresso", "2.00").await;
    let u = seed_user(&state, "henry").await;

    cart::add_or_increment(&state.pool, u.id, item, 3).await.unwrap();
    let placed = order::checkout(&state.pool, u.id).await.unwrap();

    order::delete(&state.pool, placed.id).await.unwrap();
    assert!(order::find_by_id(&state.pool, placed.id).await.unwrap().is_none());
    assert!(order::items_for(&state.pool, placed.id).await.unwrap().is_empty());

    assert!(matches!(
        order::delete(&state.pool, placed.id).await,
        Err(RepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn role_membership_is_idempotent() {
    let (state, _dir) = test_state().await;
    let u = seed_user(&state, "iris").await;

    assert!(user::add_role(&state.pool, u.id, Role::Manager).await.unwrap());
    // Second add is a no-op success, not a duplicate row
    assert!(!user::add_role(&state.pool, u.id, Role::Manager).await.unwrap());

    let members = user::in_role(&state.pool, Role::Manager).await.unwrap();
    assert_eq!(members.iter().filter(|m| m.id == u.id).count(), 1);

    assert!(user::remove_role(&state.pool, u.id, Role::Manager).await.unwrap());
    assert!(!user::remove_role(&state.pool, u.id, Role::Manager).await.unwrap());

    assert!(matches!(
        user::add_role(&state.pool, 404_404, Role::Manager).await,
        Err(RepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn category_deletion_is_protected_while_referenced() {
    let (state, _dir) = test_state().await;
    let in_use = category::create(
        &state.pool,
        CategoryCreate {
            title: "Desserts".into(),
            slug: None,
        },
    )
    .await
    .unwrap();
    menu_item::create(
        &state.pool,
        MenuItemCreate {
            title: "Panna Cotta".into(),
            price: "5.00".parse().unwrap(),
            featured: None,
            category_id: in_use.id,
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        category::delete(&state.pool, in_use.id).await,
        Err(RepoError::Referenced(_))
    ));

    let unused = category::create(
        &state.pool,
        CategoryCreate {
            title: "Seasonal".into(),
            slug: None,
        },
    )
    .await
    .unwrap();
    assert!(category::delete(&state.pool, unused.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_category_title_conflicts() {
    let (state, _dir) = test_state().await;
    category::create(
        &state.pool,
        CategoryCreate {
            title: "Drinks".into(),
            slug: None,
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        category::create(
            &state.pool,
            CategoryCreate {
                title: "Drinks".into(),
                slug: None,
            },
        )
        .await,
        Err(RepoError::Duplicate(_))
    ));
}
