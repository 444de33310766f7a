//! Data Models

// Auth
pub mod role;
pub mod user;

// Catalog
pub mod category;
pub mod menu_item;

// Ordering
pub mod cart;
pub mod order;

// Re-exports
pub use role::{Role, UnknownRole};
pub use user::{User, UserCreate, UserProfile, UserSummary};
pub use category::{Category, CategoryCreate, CategoryUpdate, slugify};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemResponse, MenuItemUpdate};
pub use cart::{CartAdd, CartLine, CartLineDetail, CartLineResponse};
pub use order::{
    CheckoutResponse, Order, OrderDetailResponse, OrderItem, OrderItemDetail,
    OrderItemResponse, OrderResponse, OrderUpdate, StatusFlag, StatusPatch,
};
