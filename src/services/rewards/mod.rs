//! Rewards subsystem: activities, coin requests, presents and the balance
//! ledger they all share.

pub mod activities;
pub mod coin_requests;
pub mod ledger;
pub mod presents;

pub use activities::ActivityService;
pub use coin_requests::CoinRequestService;
pub use ledger::LedgerService;
pub use presents::PresentService;
