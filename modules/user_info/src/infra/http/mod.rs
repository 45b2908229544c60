mod client;

pub use client::UserInfoRestClient;
