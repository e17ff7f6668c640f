//! Database backends implementing [`SearchConnection`](crate::core::SearchConnection).

#[cfg(feature = "postgres")]
pub mod postgres;
