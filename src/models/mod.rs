//! Request and Response models for the storefront API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddToCartRequest, GameDetailQuery, GamesQuery, ListQuery, LoginRequest, NewFavoriteRequest,
    NewOrderRequest, NewProductRequest, RegisterRequest, UpdateCartRequest, UserQuery,
};
pub use responses::{AuthResponse, EmptyListingResponse, HealthResponse, SuccessResponse};
