pub mod carts;
pub mod checkout;
pub mod items;
pub mod orders;
pub mod products;

pub use carts::{AddToCartInput, CartAction, CartLine, CartService};
pub use checkout::{CheckoutResult, CheckoutService};
pub use items::{AdminItem, ItemService};
pub use orders::{OrderDetail, OrderService, OrderSummary, PendingOrder};
pub use products::{
    AdminProduct, CreateProductInput, ProductPage, ProductService, StateChange, StoreProduct,
    UpdateProductInput,
};
