pub mod activities;
pub mod carts;
pub mod coin_requests;
pub mod common;
pub mod imports;
pub mod orders;
pub mod presents;
pub mod products;
pub mod users;
