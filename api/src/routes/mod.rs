pub mod health_route;
pub mod index_page;
pub mod query;
