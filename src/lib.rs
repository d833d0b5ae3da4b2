pub mod core {
    pub mod command;
    pub mod controller;
    pub mod domain;
    pub mod events;
    pub mod library;
    pub mod repository;
}

pub mod utils {
    pub mod date;
    pub mod ddb;
    pub mod ddb_repository;
    pub mod memory;
}

pub mod accounts;
pub mod books;
pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod gateway;
pub mod ledger;
pub mod members;
pub mod web;
