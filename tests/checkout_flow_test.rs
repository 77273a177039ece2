mod common;

use common::TestApp;
use ucoin_store_api::entities::balance_history::{LedgerAction, LedgerCategory};
use ucoin_store_api::entities::commerce::order::{Office, OrderState};
use ucoin_store_api::errors::ServiceError;
use ucoin_store_api::services::commerce::{
    AddToCartInput, CartAction, CreateProductInput, UpdateProductInput,
};
use ucoin_store_api::services::rewards::LedgerService;
use uuid::Uuid;

async fn stocked_item(app: &TestApp, name: &str, price: i32) -> Uuid {
    let product = app
        .services
        .products
        .create(
            CreateProductInput {
                category_id: None,
                name: name.to_string(),
                price,
                description: String::new(),
            },
            format!("products/{}.png", name),
        )
        .await
        .unwrap();
    let item = app
        .services
        .items
        .create(
            product.id,
            "black".to_string(),
            format!("items/{}-black.png", name),
            true,
        )
        .await
        .unwrap();
    app.services.items.add_size(item.id, "M").await.unwrap();
    item.id
}

#[tokio::test]
async fn checkout_freezes_the_cart_into_an_order() {
    let app = TestApp::new().await;
    let user = app.create_user("Ivan", "Petrov", 500).await;
    let item_id = stocked_item(&app, "Hoodie", 100).await;

    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();
    // The same pair again bumps the quantity instead of adding a row.
    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id,
                size: "M".to_string(),
                action: Some(CartAction::Add),
            },
        )
        .await
        .unwrap();

    let lines = app.services.carts.list(user.user_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].count, 2);

    let result = app
        .services
        .checkout
        .checkout(user.user_id, Office::Lenina)
        .await
        .unwrap();
    assert_eq!(result.total_price, 200);
    assert_eq!(app.balance_of(user.user_id).await, 300);
    assert!(app.services.carts.list(user.user_id).await.unwrap().is_empty());

    // The debit lands in the ledger as a single row tied to the order.
    let history = LedgerService::history_for_user(&*app.db, user.user_id, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, LedgerAction::Expense);
    assert_eq!(history[0].category, LedgerCategory::Order);
    assert_eq!(history[0].category_id, result.order_id);
    assert_eq!(history[0].amount, 200);

    let own = app
        .services
        .orders
        .list_for_user(user.user_id, None)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].state, OrderState::InProgress);
    assert_eq!(own[0].full_price, 200);

    // The snapshot keeps the line items exactly as they were bought.
    let detail = app.services.orders.detail(result.order_id).await.unwrap();
    assert_eq!(detail.product_list.len(), 1);
    assert_eq!(detail.product_list[0].count, 2);
    assert_eq!(detail.product_list[0].price, 100);
    assert_eq!(detail.office, Office::Lenina);
    assert_eq!(detail.user_name, "Ivan Petrov");
}

#[tokio::test]
async fn the_snapshot_outlives_catalog_edits() {
    let app = TestApp::new().await;
    let user = app.create_user("Olga", "Smirnova", 400).await;

    let product = app
        .services
        .products
        .create(
            CreateProductInput {
                category_id: None,
                name: "Mug".to_string(),
                price: 150,
                description: String::new(),
            },
            "products/mug.png".to_string(),
        )
        .await
        .unwrap();
    let item = app
        .services
        .items
        .create(
            product.id,
            "white".to_string(),
            "items/mug-white.png".to_string(),
            true,
        )
        .await
        .unwrap();
    app.services.items.add_size(item.id, "M").await.unwrap();

    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id: item.id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();

    let result = app
        .services
        .checkout
        .checkout(user.user_id, Office::Lenina)
        .await
        .unwrap();
    assert_eq!(result.total_price, 150);

    // Rename the product and hike its price after the fact.
    app.services
        .products
        .update(
            product.id,
            UpdateProductInput {
                new_category: None,
                new_name: Some("Big Mug".to_string()),
                new_description: None,
                new_price: Some(999),
                new_photo_path: None,
            },
        )
        .await
        .unwrap();

    // The order still shows what was actually bought.
    let detail = app.services.orders.detail(result.order_id).await.unwrap();
    assert_eq!(detail.total_price, 150);
    assert_eq!(detail.product_list[0].price, 150);
    assert_eq!(detail.product_list[0].name, "Mug");

    let own = app
        .services
        .orders
        .list_for_user(user.user_id, None)
        .await
        .unwrap();
    assert_eq!(own[0].full_price, 150);
}

#[tokio::test]
async fn an_empty_cart_cannot_be_checked_out() {
    let app = TestApp::new().await;
    let user = app.create_user("Petr", "Ivanov", 100).await;

    let result = app
        .services
        .checkout
        .checkout(user.user_id, Office::Mira)
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));
}

#[tokio::test]
async fn failed_checkout_leaves_the_cart_untouched() {
    let app = TestApp::new().await;
    let user = app.create_user("Anna", "Sidorova", 50).await;
    let item_id = stocked_item(&app, "Backpack", 300).await;

    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();

    let result = app
        .services
        .checkout
        .checkout(user.user_id, Office::Yasnaya)
        .await;
    assert!(matches!(result, Err(ServiceError::InsufficientBalance(_))));

    // The transaction rolled back: cart intact, no money gone, no order.
    assert_eq!(app.services.carts.list(user.user_id).await.unwrap().len(), 1);
    assert_eq!(app.balance_of(user.user_id).await, 50);
    assert!(app
        .services
        .orders
        .list_for_user(user.user_id, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn completing_an_order_is_a_one_way_transition() {
    let app = TestApp::new().await;
    let user = app.create_user("Olga", "Smirnova", 1000).await;
    let item_id = stocked_item(&app, "Mug", 40).await;

    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();
    let result = app
        .services
        .checkout
        .checkout(user.user_id, Office::Lenina)
        .await
        .unwrap();

    let pending = app.services.orders.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order_id, result.order_id);

    app.services.orders.complete(result.order_id).await.unwrap();
    assert!(app.services.orders.list_pending().await.unwrap().is_empty());

    assert!(matches!(
        app.services.orders.complete(result.order_id).await,
        Err(ServiceError::Conflict(_))
    ));
}

#[tokio::test]
async fn cart_quantity_can_be_stepped_down_to_removal() {
    let app = TestApp::new().await;
    let user = app.create_user("Ivan", "Petrov", 100).await;
    let item_id = stocked_item(&app, "Cap", 20).await;

    app.services
        .carts
        .add(
            user.user_id,
            AddToCartInput {
                item_id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();
    let lines = app.services.carts.list(user.user_id).await.unwrap();
    let cart_item_id = lines[0].cart_item_id;

    // Going below one drops the row.
    app.services
        .carts
        .change_count(user.user_id, cart_item_id, CartAction::Remove)
        .await
        .unwrap();
    assert!(app.services.carts.list(user.user_id).await.unwrap().is_empty());
}
