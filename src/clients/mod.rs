pub mod range_provider;
