// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod docker_repo;
pub mod error;
pub mod models;
pub mod presenter;
pub mod probe;
pub mod routes;
pub mod supervisor_repo;
pub mod sysinfo_repo;
pub mod version;
