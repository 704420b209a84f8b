//! Office records: domain types, persistence port and the business service.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use domain::{OfficeDto, OfficeRequest, PictureUrl, ValidOffice};
pub use service::OfficeService;
