pub mod momo_client;
