pub mod notifications;
pub mod prices;
