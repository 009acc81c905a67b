//! REST client for the car inventory service.
//!
//! The service speaks JSON over authenticated HTTPS and wraps every payload
//! in a `{ dataSource: … }` envelope. This crate exposes the seven
//! operations the console needs (the two schema fetches, record detail,
//! list/search, create, update, and soft delete) as typed async methods on
//! [`FleetClient`], plus the wire models they exchange.

pub mod client;
pub mod error;
pub mod models;

pub use client::FleetClient;
pub use error::ApiError;
pub use models::{
    CarDetail, CarPage, CarRecord, ColumnProps, PageInfo, RecordState, SearchParams, SortOrder,
    TableHeader,
};
