pub mod commerce;
pub mod import;
pub mod rewards;
pub mod storage;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::events::EventSender;
use commerce::{CartService, CheckoutService, ItemService, OrderService, ProductService};
use import::ImportService;
use rewards::{ActivityService, CoinRequestService, PresentService};
use storage::StorageService;
use users::UserService;

/// Bundle of all service instances, built once at startup and shared through
/// the router state.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub activities: ActivityService,
    pub coin_requests: CoinRequestService,
    pub presents: PresentService,
    pub products: ProductService,
    pub items: ItemService,
    pub carts: CartService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub import: ImportService,
    pub storage: StorageService,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        storage: StorageService,
    ) -> Self {
        let users = Arc::new(UserService::new(db.clone(), event_sender.clone()));
        Self {
            activities: ActivityService::new(db.clone()),
            coin_requests: CoinRequestService::new(db.clone(), event_sender.clone()),
            presents: PresentService::new(db.clone(), event_sender.clone()),
            products: ProductService::new(db.clone(), event_sender.clone(), storage.clone()),
            items: ItemService::new(db.clone(), storage.clone()),
            carts: CartService::new(db.clone()),
            checkout: CheckoutService::new(db.clone(), event_sender.clone()),
            orders: OrderService::new(db, event_sender),
            import: ImportService::new(users.clone()),
            users,
            storage,
        }
    }
}
