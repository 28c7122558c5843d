//! Single-source-of-truth observable collections.
//!
//! Each manager owns one collection (cart lines, wishlist ids, addresses,
//! orders), mutates it only through methods that also perform the remote
//! call, and publishes an immutable snapshot through a `tokio::sync::watch`
//! channel after each successful mutation.
//!
//! Mutations on one manager are serialized by an async mutex held across
//! the remote call: one in-flight mutation at a time, so overlapping calls
//! can never interleave and the published snapshot always reflects the last
//! applied mutation. Rapid repeated actions still issue one remote call
//! each - there is no debouncing or batching.

pub mod address;
pub mod cart;
pub mod orders;
pub mod wishlist;

pub use address::AddressManager;
pub use cart::CartManager;
pub use orders::OrdersManager;
pub use wishlist::WishlistManager;
