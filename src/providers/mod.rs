pub mod open_exchange;

pub use open_exchange::OpenExchangeRatesProvider;
