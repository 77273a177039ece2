mod common;

use common::TestApp;
use ucoin_store_api::entities::commerce::size::NO_SIZE_LABEL;
use ucoin_store_api::entities::commerce::LifecycleState;
use ucoin_store_api::errors::ServiceError;
use ucoin_store_api::services::commerce::{AddToCartInput, CreateProductInput, StateChange};
use ucoin_store_api::entities::commerce::product;

async fn create_product(app: &TestApp, name: &str, price: i32) -> product::Model {
    app.services
        .products
        .create(
            CreateProductInput {
                category_id: None,
                name: name.to_string(),
                price,
                description: "A fine piece of merch".to_string(),
            },
            format!("products/{}.png", name),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn archiving_is_idempotent() {
    let app = TestApp::new().await;
    let product = create_product(&app, "T-shirt", 50).await;

    let first = app
        .services
        .products
        .change_state(product.id, LifecycleState::Archived)
        .await
        .unwrap();
    assert_eq!(first, StateChange::Changed);

    let second = app
        .services
        .products
        .change_state(product.id, LifecycleState::Archived)
        .await
        .unwrap();
    assert_eq!(second, StateChange::Already);

    let stored = app.services.products.get(product.id).await.unwrap();
    assert_eq!(stored.state, LifecycleState::Archived);
}

#[tokio::test]
async fn the_store_hides_products_nobody_can_buy() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Sticker pack", 10).await;

    // No variants yet: not purchasable.
    assert!(app.services.products.list_store().await.unwrap().is_empty());

    // A variant without sizes is still not purchasable.
    let item = app
        .services
        .items
        .create(
            product.id,
            "holo".to_string(),
            "items/stickers-holo.png".to_string(),
            true,
        )
        .await
        .unwrap();
    assert!(app.services.products.list_store().await.unwrap().is_empty());

    app.services.items.add_size(item.id, "S").await.unwrap();
    let store = app.services.products.list_store().await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store[0].name, "Sticker pack");

    // Archived products drop off the store front regardless.
    app.services
        .products
        .change_state(product.id, LifecycleState::Archived)
        .await
        .unwrap();
    assert!(app.services.products.list_store().await.unwrap().is_empty());

    // The admin list still shows everything.
    assert_eq!(app.services.products.list_admin().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_colors_are_rejected_per_product() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Hoodie", 120).await;

    app.services
        .items
        .create(
            product.id,
            "black".to_string(),
            "items/hoodie-black.png".to_string(),
            true,
        )
        .await
        .unwrap();

    let duplicate = app
        .services
        .items
        .create(
            product.id,
            "black".to_string(),
            "items/hoodie-black-2.png".to_string(),
            true,
        )
        .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn unsized_items_carry_the_no_size_label() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Mug", 30).await;

    app.services
        .items
        .create(
            product.id,
            "white".to_string(),
            "items/mug-white.png".to_string(),
            false,
        )
        .await
        .unwrap();

    let items = app.services.items.list_for_product(product.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].sizes, vec![NO_SIZE_LABEL.to_string()]);
    // Nothing else can be attached to a one-size item.
    assert!(items[0].sizes_unused.is_empty());

    // It counts as purchasable right away.
    assert_eq!(app.services.products.list_store().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unused_sizes_exclude_what_the_item_already_has() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Jacket", 200).await;

    let item = app
        .services
        .items
        .create(
            product.id,
            "green".to_string(),
            "items/jacket-green.png".to_string(),
            true,
        )
        .await
        .unwrap();
    app.services.items.add_size(item.id, "M").await.unwrap();
    app.services.items.add_size(item.id, "L").await.unwrap();
    // Attaching an already-attached size is a no-op.
    app.services.items.add_size(item.id, "M").await.unwrap();

    let items = app.services.items.list_for_product(product.id).await.unwrap();
    assert_eq!(items[0].sizes, vec!["M".to_string(), "L".to_string()]);
    assert_eq!(
        items[0].sizes_unused,
        vec![
            "XS".to_string(),
            "S".to_string(),
            "XL".to_string(),
            "XXL".to_string(),
            "XXXL".to_string(),
        ]
    );

    app.services.items.remove_size(item.id, "L").await.unwrap();
    assert!(matches!(
        app.services.items.remove_size(item.id, "L").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn the_product_page_reflects_the_viewers_cart() {
    let app = TestApp::new().await;
    let viewer = app.create_user("Ivan", "Petrov", 500).await;
    let product = create_product(&app, "Cap", 25).await;

    let item = app
        .services
        .items
        .create(
            product.id,
            "navy".to_string(),
            "items/cap-navy.png".to_string(),
            true,
        )
        .await
        .unwrap();
    app.services.items.add_size(item.id, "S").await.unwrap();
    app.services.items.add_size(item.id, "M").await.unwrap();

    app.services
        .carts
        .add(
            viewer.user_id,
            AddToCartInput {
                item_id: item.id,
                size: "M".to_string(),
                action: None,
            },
        )
        .await
        .unwrap();

    let page = app
        .services
        .products
        .product_page(viewer.user_id, product.id)
        .await
        .unwrap();
    assert_eq!(page.product_info.product_name, "Cap");
    assert_eq!(page.size_list, vec!["S".to_string(), "M".to_string()]);
    assert_eq!(page.product_items.len(), 1);
    assert_eq!(page.product_items[0].sizes.get("M"), Some(&Some(1)));
    assert_eq!(page.product_items[0].sizes.get("S"), Some(&None));
}
