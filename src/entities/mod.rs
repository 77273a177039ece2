//! Database entities for the ucoin rewards platform.
//!
//! Identity and rewards entities live at the top level; the store
//! (products, carts, orders) lives under [`commerce`].

pub mod activity;
pub mod balance_history;
pub mod coin_request;
pub mod commerce;
pub mod present;
pub mod user;
pub mod user_profile;

pub use activity::Entity as Activity;
pub use balance_history::Entity as BalanceHistory;
pub use coin_request::Entity as CoinRequest;
pub use present::Entity as Present;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;

pub use activity::Model as ActivityModel;
pub use balance_history::Model as BalanceHistoryModel;
pub use coin_request::Model as CoinRequestModel;
pub use present::Model as PresentModel;
pub use user::Model as UserModel;
pub use user_profile::Model as UserProfileModel;
