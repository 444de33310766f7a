//! API access-control integration tests
//!
//! Drives the full axum stack (middleware + policy + handlers) with
//! in-process requests and real JWTs.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use bistro_server::db::repository::{cart, category, menu_item, order, user};
use bistro_server::{Config, ServerState};
use shared::models::{CategoryCreate, MenuItemCreate, Role, User};

async fn test_app() -> (Router, ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    let app = bistro_server::api::build_app(&state).with_state(state.clone());
    (app, state, dir)
}

async fn seed_user(state: &ServerState, username: &str, roles: &[Role]) -> User {
    let u = user::create(
        &state.pool,
        username,
        &format!("{username}@example.com"),
        "unused-hash",
        false,
    )
    .await
    .unwrap();
    for role in roles {
        user::add_role(&state.pool, u.id, *role).await.unwrap();
    }
    u
}

fn token_for(state: &ServerState, u: &User, roles: &[Role], is_admin: bool) -> String {
    state
        .jwt_service
        .generate_token(u.id, &u.username, roles, is_admin)
        .unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed a placed order for `owner`, optionally assigned to a crew member.
async fn seed_order(state: &ServerState, owner: &User, crew: Option<&User>) -> i64 {
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
    let item = menu_item::create(
        &state.pool,
        MenuItemCreate {
            title: format!("Dish for {}", owner.username),
            price: "10.00".parse().unwrap(),
            featured: None,
            category_id: cat.id,
        },
    )
    .await
    .unwrap();
    cart::add_or_increment(&state.pool, owner.id, item.id, 1)
        .await
        .unwrap();
    let placed = order::checkout(&state.pool, owner.id).await.unwrap();
    if let Some(crew) = crew {
        order::update_fields(&state.pool, placed.id, None, Some(crew.id))
            .await
            .unwrap();
    }
    placed.id
}

#[tokio::test]
async fn anonymous_menu_browsing_is_public_but_writes_are_not() {
    let (app, _state, _dir) = test_app().await;

    let res = app
        .clone()
        .oneshot(request("GET", "/api/menu-items", None, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/menu-items",
            None,
            Some(r#"{"title":"Sneaky","price":1.00,"category_id":1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn menu_writes_require_the_manager_role() {
    let (app, state, _dir) = test_app().await;
    let customer = seed_user(&state, "plain", &[]).await;
    let token = token_for(&state, &customer, &[], false);

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/categories",
            Some(&token),
            Some(r#"{"title":"Starters"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let manager = seed_user(&state, "boss", &[Role::Manager]).await;
    let token = token_for(&state, &manager, &[Role::Manager], false);
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/categories",
            Some(&token),
            Some(r#"{"title":"Starters"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn assigned_crew_updates_status_with_boolean_or_binary_literal() {
    let (app, state, _dir) = test_app().await;
    let owner = seed_user(&state, "guest", &[]).await;
    let crew = seed_user(&state, "driver", &[Role::DeliveryCrew]).await;
    let order_id = seed_order(&state, &owner, Some(&crew)).await;

    let token = token_for(&state, &crew, &[Role::DeliveryCrew], false);
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(r#"{"status": 1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], serde_json::json!(true));
}

#[tokio::test]
async fn crew_status_update_rejects_extra_fields() {
    let (app, state, _dir) = test_app().await;
    let owner = seed_user(&state, "guest2", &[]).await;
    let crew = seed_user(&state, "driver2", &[Role::DeliveryCrew]).await;
    let order_id = seed_order(&state, &owner, Some(&crew)).await;

    let token = token_for(&state, &crew, &[Role::DeliveryCrew], false);
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(r#"{"status": 1, "total": 50}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unassigned_crew_cannot_update_status() {
    let (app, state, _dir) = test_app().await;
    let owner = seed_user(&state, "guest3", &[]).await;
    let assigned = seed_user(&state, "driver3", &[Role::DeliveryCrew]).await;
    let other = seed_user(&state, "driver4", &[Role::DeliveryCrew]).await;
    let order_id = seed_order(&state, &owner, Some(&assigned)).await;

    let token = token_for(&state, &other, &[Role::DeliveryCrew], false);
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(r#"{"status": 1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Customers have no status-update path at all
    let token = token_for(&state, &owner, &[], false);
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(r#"{"status": 1}"#),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_listing_is_partitioned_by_role() {
    let (app, state, _dir) = test_app().await;
    let u1 = seed_user(&state, "cust1", &[]).await;
    let u2 = seed_user(&state, "cust2", &[]).await;
    let d1 = seed_user(&state, "crew1", &[Role::DeliveryCrew]).await;
    let manager = seed_user(&state, "mgr1", &[Role::Manager]).await;

    let o1 = seed_order(&state, &u1, None).await;
    let o2 = seed_order(&state, &u2, Some(&d1)).await;

    let ids = |body: &serde_json::Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_i64().unwrap())
            .collect()
    };

    let token = token_for(&state, &u1, &[], false);
    let res = app
        .clone()
        .oneshot(request("GET", "/api/orders", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(res).await), vec![o1]);

    let token = token_for(&state, &d1, &[Role::DeliveryCrew], false);
    let res = app
        .clone()
        .oneshot(request("GET", "/api/orders", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(res).await), vec![o2]);

    let token = token_for(&state, &manager, &[Role::Manager], false);
    let res = app
        .clone()
        .oneshot(request("GET", "/api/orders", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(res).await).len(), 2);
}

#[tokio::test]
async fn checkout_requires_a_non_empty_cart() {
    let (app, state, _dir) = test_app().await;
    let u = seed_user(&state, "hungry", &[]).await;
    let token = token_for(&state, &u, &[], false);

    let res = app
        .clone()
        .oneshot(request("POST", "/api/orders", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["code"], "E4001");
}

#[tokio::test]
async fn group_membership_round_trip_over_the_api() {
    let (app, state, _dir) = test_app().await;
    let manager = seed_user(&state, "chief", &[Role::Manager]).await;
    let target = seed_user(&state, "rookie", &[]).await;
    let token = token_for(&state, &manager, &[Role::Manager], false);

    let add = format!(r#"{{"user_id": {}}}"#, target.id);
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/groups/delivery-crew/users",
            Some(&token),
            Some(&add),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["data"], serde_json::json!(true));

    // Idempotent repeat reports success with an informational message
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/groups/delivery-crew/users",
            Some(&token),
            Some(&add),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["data"], serde_json::json!(false));
    assert!(body["message"].as_str().unwrap().contains("already"));

    let res = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/groups/delivery-crew/users/{}", target.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Removing a non-member is NotFound
    let res = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/groups/delivery-crew/users/{}", target.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Unknown group names are 404s
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/groups/wizards/users",
            Some(&token),
            Some(&add),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Non-managers may not administer groups
    let token = token_for(&state, &target, &[], false);
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/groups/manager/users",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_detail_follows_the_visibility_partition() {
    let (app, state, _dir) = test_app().await;
    let owner = seed_user(&state, "owner1", &[]).await;
    let stranger = seed_user(&state, "stranger", &[]).await;
    let order_id = seed_order(&state, &owner, None).await;

    let token = token_for(&state, &owner, &[], false);
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], serde_json::json!(10.0));

    let token = token_for(&state, &stranger, &[], false);
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request("GET", "/api/orders/424242", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
